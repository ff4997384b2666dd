use crate::backend::{GenerationBackend, Img2ImgRequest, Txt2ImgRequest};
use crate::codec::encode_png;
use crate::context::CONFIG_FILE_NAME;
use crate::error::{ForgeError, Result};
use image::{Rgba, RgbaImage};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Palette used by test projects: pure red and pure blue.
pub(crate) const TEST_CONFIG: &str = r##"
color_schemes:
  Dusk: ["#FF0000", "#0000FF"]
recolor:
  blur: false
"##;

/// A project root with `tintforge.yaml` and an empty task tree.
pub(crate) fn create_test_project(config_yaml: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_yaml).unwrap();
    std::fs::create_dir_all(temp_dir.path().join("ImgIdeas")).unwrap();
    temp_dir
}

/// Write a descriptor for `task_id` (e.g. `forest/owl`) under the task tree.
pub(crate) fn write_task(project: &Path, task_id: &str, json: &str) -> PathBuf {
    let path = project.join("ImgIdeas").join(format!("{}.json", task_id));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, json).unwrap();
    path
}

/// A solid-color PNG.
pub(crate) fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba(rgba))).unwrap()
}

/// Backend double that records every request.
///
/// Returns a small solid image unless told to fail; failures can target one
/// request kind or any request whose prompt contains a marker.
pub(crate) struct MockBackend {
    txt2img_requests: RefCell<Vec<Txt2ImgRequest>>,
    img2img_requests: RefCell<Vec<Img2ImgRequest>>,
    fail_txt2img: Cell<bool>,
    fail_img2img: Cell<bool>,
    fail_marker: RefCell<Option<String>>,
    empty_responses: Cell<bool>,
    output: Vec<u8>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            txt2img_requests: RefCell::new(Vec::new()),
            img2img_requests: RefCell::new(Vec::new()),
            fail_txt2img: Cell::new(false),
            fail_img2img: Cell::new(false),
            fail_marker: RefCell::new(None),
            empty_responses: Cell::new(false),
            output: png_bytes(4, 4, [200, 40, 40, 255]),
        }
    }

    pub(crate) fn fail_txt2img(&self, fail: bool) {
        self.fail_txt2img.set(fail);
    }

    pub(crate) fn fail_img2img(&self, fail: bool) {
        self.fail_img2img.set(fail);
    }

    /// Fail any request whose prompt contains `marker`.
    pub(crate) fn fail_prompts_containing(&self, marker: &str) {
        *self.fail_marker.borrow_mut() = Some(marker.to_string());
    }

    /// Succeed with zero images.
    pub(crate) fn return_no_images(&self, empty: bool) {
        self.empty_responses.set(empty);
    }

    pub(crate) fn txt2img_count(&self) -> usize {
        self.txt2img_requests.borrow().len()
    }

    pub(crate) fn img2img_count(&self) -> usize {
        self.img2img_requests.borrow().len()
    }

    pub(crate) fn total_requests(&self) -> usize {
        self.txt2img_count() + self.img2img_count()
    }

    pub(crate) fn txt2img_requests(&self) -> Vec<Txt2ImgRequest> {
        self.txt2img_requests.borrow().clone()
    }

    pub(crate) fn img2img_requests(&self) -> Vec<Img2ImgRequest> {
        self.img2img_requests.borrow().clone()
    }

    fn respond(&self, fail: bool, prompt: &str) -> Result<Vec<Vec<u8>>> {
        let marked = self
            .fail_marker
            .borrow()
            .as_deref()
            .is_some_and(|marker| prompt.contains(marker));
        if fail || marked {
            return Err(ForgeError::GenerationFailed {
                status: Some(500),
                message: "mock backend failure".to_string(),
            });
        }
        if self.empty_responses.get() {
            return Ok(Vec::new());
        }
        Ok(vec![self.output.clone()])
    }
}

impl GenerationBackend for MockBackend {
    fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Vec<Vec<u8>>> {
        self.txt2img_requests.borrow_mut().push(request.clone());
        self.respond(self.fail_txt2img.get(), &request.prompt)
    }

    fn img2img(&self, request: &Img2ImgRequest) -> Result<Vec<Vec<u8>>> {
        self.img2img_requests.borrow_mut().push(request.clone());
        self.respond(self.fail_img2img.get(), &request.params.prompt)
    }
}
