#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// A DOTA-style split root with `PNGImages/` and `Annotations/`.
pub struct DotaFixture {
    pub root: PathBuf,
}

impl DotaFixture {
    pub fn new(root: &Path) -> Self {
        fs::create_dir_all(root.join("PNGImages")).expect("create images dir");
        fs::create_dir_all(root.join("Annotations")).expect("create annotations dir");
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("PNGImages")
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.root.join("Annotations")
    }

    /// Add a BMP image; the file keeps whatever extension `file_name` has.
    pub fn image(&self, file_name: &str, width: u32, height: u32) -> &Self {
        write_bmp(&self.images_dir().join(file_name), width, height);
        self
    }

    pub fn raw_image(&self, file_name: &str, bytes: &[u8]) -> &Self {
        fs::write(self.images_dir().join(file_name), bytes).expect("write raw image");
        self
    }

    pub fn annotation(&self, stem: &str, content: &str) -> &Self {
        fs::write(self.annotations_dir().join(format!("{stem}.txt")), content)
            .expect("write annotation");
        self
    }
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
