//! Exit code constants for the tintforge CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config, missing task tree, bad descriptor)
//! - 2: Image codec failure
//! - 3: Generation backend failure
//! - 4: Artifact claim (lock) failure
//! - 5: Run finished but one or more units failed (`run --strict`)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or missing inputs.
pub const USER_ERROR: i32 = 1;

/// Image could not be decoded or encoded.
pub const IMAGE_FAILURE: i32 = 2;

/// The generation backend returned a failure or an unusable response.
pub const GENERATION_FAILURE: i32 = 3;

/// An artifact claim or other lock could not be acquired.
pub const LOCK_FAILURE: i32 = 4;

/// A strict run completed with failed units.
pub const UNITS_FAILED: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            IMAGE_FAILURE,
            GENERATION_FAILURE,
            LOCK_FAILURE,
            UNITS_FAILED,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
    }
}
