use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

/// Templates and public files bundled at build time from `res/`
const RES_ARCHIVE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/res.tar.gz"));

pub fn decompress_files(output: &Path) -> io::Result<()> {
    let tar = GzDecoder::new(RES_ARCHIVE);
    let mut archive = Archive::new(tar);
    archive.unpack(output)?;

    Ok(())
}
