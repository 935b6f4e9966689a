//! Reader for the CIFAR-10 binary archive.
//!
//! The archive directory (`cifar-10-batches-bin/`) holds five training batch
//! files and one test batch file. Every record is `1 + 3072` bytes: a label
//! byte in `[0, 9]` followed by the image as three channel planes (1024 red,
//! 1024 green, 1024 blue bytes in row-major order). Rows stay in this flat
//! channel-first layout until [`decode_image`] un-interleaves them into a
//! channel-last raster.
//!
//! The files can be downloaded from
//! <https://www.cs.toronto.edu/~kriz/cifar.html> (binary version).

use anyhow::{anyhow, ensure, Context, Result};
use image::RgbImage;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Image width in pixels.
pub const IMAGE_WIDTH: u32 = 32;
/// Image height in pixels.
pub const IMAGE_HEIGHT: u32 = 32;
/// Colour channels per image.
pub const CHANNELS: u32 = 3;
/// Number of classes in the dataset.
pub const NUM_CLASSES: usize = 10;

/// Bytes per stored image (one full channel plane per colour).
pub const IMAGE_BYTES: usize = (IMAGE_WIDTH * IMAGE_HEIGHT * CHANNELS) as usize;
/// Bytes per archive record: label byte + image bytes.
const RECORD_BYTES: usize = 1 + IMAGE_BYTES;

/// Sub-directory of the dataset root that holds the batch files.
const ARCHIVE_DIR: &str = "cifar-10-batches-bin";

const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];
const TEST_FILE: &str = "test_batch.bin";

/// Raw archive contents: flat channel-first image rows plus parallel labels.
///
/// Rows are stored back-to-back in one contiguous buffer so the splitter can
/// slice per-class subsets without copying. The constructor is private to
/// this module; the readers guarantee `data.len() == labels.len() * IMAGE_BYTES`.
#[derive(Debug, Clone)]
pub struct RawDataset {
    data: Vec<u8>,
    labels: Vec<i64>,
}

impl RawDataset {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Checks whether the archive holds any samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the flat channel-first bytes of one image row.
    pub fn row(&self, index: usize) -> &[u8] {
        &self.data[index * IMAGE_BYTES..(index + 1) * IMAGE_BYTES]
    }

    /// Returns the class label of one row.
    pub fn label(&self, index: usize) -> i64 {
        self.labels[index]
    }

    /// All labels, in row order.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }
}

/// Reads one batch file into `(flat image rows, labels)`.
///
/// The row count is derived from the file size, which must be a whole number
/// of records. A label byte outside `[0, NUM_CLASSES)` means the file is not
/// a batch file of this dataset and is rejected.
fn read_batch_file(path: &Path) -> Result<(Vec<u8>, Vec<i64>)> {
    let file =
        File::open(path).with_context(|| format!("Failed to open batch file {}", path.display()))?;
    let mut buffer = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;

    ensure!(
        !buffer.is_empty() && buffer.len() % RECORD_BYTES == 0,
        "Batch file {} has size {} which is not a whole number of {}-byte records",
        path.display(),
        buffer.len(),
        RECORD_BYTES
    );

    let num_rows = buffer.len() / RECORD_BYTES;
    let mut data = Vec::with_capacity(num_rows * IMAGE_BYTES);
    let mut labels = Vec::with_capacity(num_rows);
    for record in buffer.chunks_exact(RECORD_BYTES) {
        let label = i64::from(record[0]);
        ensure!(
            (label as usize) < NUM_CLASSES,
            "Label {} out of range [0, {}) in {}",
            label,
            NUM_CLASSES,
            path.display()
        );
        labels.push(label);
        data.extend_from_slice(&record[1..]);
    }
    Ok((data, labels))
}

/// Loads the five training batch files under `root`, concatenated in file order.
pub fn load_train(root: &Path) -> Result<RawDataset> {
    let dir = root.join(ARCHIVE_DIR);
    let mut data = Vec::new();
    let mut labels = Vec::new();
    for name in TRAIN_FILES {
        let (batch_data, batch_labels) = read_batch_file(&dir.join(name))?;
        data.extend_from_slice(&batch_data);
        labels.extend_from_slice(&batch_labels);
    }
    Ok(RawDataset { data, labels })
}

/// Loads the test batch file under `root`.
pub fn load_test(root: &Path) -> Result<RawDataset> {
    let dir = root.join(ARCHIVE_DIR);
    let (data, labels) = read_batch_file(&dir.join(TEST_FILE))?;
    Ok(RawDataset { data, labels })
}

/// Decodes one flat channel-first row into a channel-last 32x32 RGB raster.
pub fn decode_image(row: &[u8]) -> Result<RgbImage> {
    ensure!(
        row.len() == IMAGE_BYTES,
        "Image row has {} bytes, expected {}",
        row.len(),
        IMAGE_BYTES
    );

    let plane = (IMAGE_WIDTH * IMAGE_HEIGHT) as usize;
    let mut pixels = Vec::with_capacity(IMAGE_BYTES);
    for i in 0..plane {
        pixels.push(row[i]);
        pixels.push(row[plane + i]);
        pixels.push(row[2 * plane + i]);
    }

    RgbImage::from_raw(IMAGE_WIDTH, IMAGE_HEIGHT, pixels)
        .ok_or_else(|| anyhow!("Pixel buffer does not match {}x{}", IMAGE_WIDTH, IMAGE_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    /// Writes a batch file whose rows carry `(label, fill)` pairs, where the
    /// whole image is painted with the `fill` byte.
    fn write_batch(path: &Path, rows: &[(u8, u8)]) -> Result<()> {
        let mut file = File::create(path)?;
        for &(label, fill) in rows {
            file.write_all(&[label])?;
            file.write_all(&[fill; IMAGE_BYTES])?;
        }
        Ok(())
    }

    #[test]
    fn reads_all_train_batches_in_file_order() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join(ARCHIVE_DIR);
        std::fs::create_dir(&archive)?;
        for (i, name) in TRAIN_FILES.iter().enumerate() {
            write_batch(&archive.join(name), &[(i as u8, i as u8), (9, 100 + i as u8)])?;
        }

        let raw = load_train(dir.path())?;
        assert_eq!(raw.len(), 10);
        assert_eq!(raw.labels(), &[0, 9, 1, 9, 2, 9, 3, 9, 4, 9]);
        assert_eq!(raw.row(2)[0], 1); // first row of data_batch_2
        Ok(())
    }

    #[test]
    fn rejects_truncated_file() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join(ARCHIVE_DIR);
        std::fs::create_dir(&archive)?;
        std::fs::write(archive.join(TEST_FILE), [0u8; RECORD_BYTES - 1])?;

        assert!(load_test(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_label() -> Result<()> {
        let dir = tempdir()?;
        let archive = dir.path().join(ARCHIVE_DIR);
        std::fs::create_dir(&archive)?;
        write_batch(&archive.join(TEST_FILE), &[(10, 0)])?;

        assert!(load_test(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_propagates_as_error() {
        let dir = tempdir().unwrap();
        assert!(load_test(dir.path()).is_err());
    }

    #[test]
    fn decode_un_interleaves_channel_planes() -> Result<()> {
        // Constant planes: every pixel must come out as (1, 2, 3).
        let mut row = Vec::with_capacity(IMAGE_BYTES);
        row.extend_from_slice(&[1u8; 1024]);
        row.extend_from_slice(&[2u8; 1024]);
        row.extend_from_slice(&[3u8; 1024]);

        let image = decode_image(&row)?;
        assert_eq!(image.dimensions(), (IMAGE_WIDTH, IMAGE_HEIGHT));
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3]);
        assert_eq!(image.get_pixel(31, 31).0, [1, 2, 3]);
        Ok(())
    }

    #[test]
    fn decode_preserves_row_major_position() -> Result<()> {
        let mut row = vec![0u8; IMAGE_BYTES];
        // Pixel (x=1, y=2) sits at plane offset 2 * 32 + 1.
        row[2 * 32 + 1] = 11; // red plane
        row[1024 + 2 * 32 + 1] = 22; // green plane
        row[2048 + 2 * 32 + 1] = 33; // blue plane

        let image = decode_image(&row)?;
        assert_eq!(image.get_pixel(1, 2).0, [11, 22, 33]);
        assert_eq!(image.get_pixel(2, 1).0, [0, 0, 0]);
        Ok(())
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(decode_image(&[0u8; 100]).is_err());
    }
}
