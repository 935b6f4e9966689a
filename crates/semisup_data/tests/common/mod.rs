//! Shared fixtures: a synthetic on-disk archive in the binary batch format.

use anyhow::Result;
use semisup_data::archive::{IMAGE_BYTES, NUM_CLASSES};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];

/// Writes one record: label byte + image whose first red/green plane bytes
/// carry the sample id, so images stay distinguishable after decoding.
fn write_record(file: &mut File, label: u8, id: u16) -> Result<()> {
    let mut row = vec![0u8; IMAGE_BYTES];
    row[0] = (id & 0xff) as u8; // red plane → pixel (0,0) channel 0
    row[1024] = (id >> 8) as u8; // green plane → pixel (0,0) channel 1
    row[2048] = label; // blue plane → pixel (0,0) channel 2
    file.write_all(&[label])?;
    file.write_all(&row)?;
    Ok(())
}

/// Builds a balanced archive under `root`: five training files with
/// `train_per_class_per_file` samples of every class each, plus a test file
/// of `test_rows` samples labeled `index % NUM_CLASSES`.
///
/// Training totals: `5 * NUM_CLASSES * train_per_class_per_file` samples,
/// `5 * train_per_class_per_file` per class.
pub fn write_synthetic_archive(
    root: &Path,
    train_per_class_per_file: usize,
    test_rows: usize,
) -> Result<()> {
    let archive_dir = root.join("cifar-10-batches-bin");
    std::fs::create_dir_all(&archive_dir)?;

    let mut id: u16 = 0;
    for name in TRAIN_FILES {
        let mut file = File::create(archive_dir.join(name))?;
        for class in 0..NUM_CLASSES as u8 {
            for _ in 0..train_per_class_per_file {
                write_record(&mut file, class, id)?;
                id += 1;
            }
        }
    }

    let mut file = File::create(archive_dir.join("test_batch.bin"))?;
    for index in 0..test_rows {
        write_record(&mut file, (index % NUM_CLASSES) as u8, id)?;
        id += 1;
    }
    Ok(())
}
