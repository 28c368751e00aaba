//! Kept in its own test binary with a single test so that the descriptor
//! count is not disturbed by other tests running concurrently.
#![cfg(target_os = "linux")]

use std::fs;
use std::path::Path;

use eyre::Result;
use tempfile::tempdir;
use yo_core::{copy, CopyConfig, CopyError};

fn open_descriptors() -> Result<usize> {
    Ok(fs::read_dir("/proc/self/fd")?.count())
}

#[test]
fn handles_closed_after_success_and_every_failure() -> Result<()> {
    let tmp = tempdir()?;
    let src = tmp.path().join("src.bin");
    fs::write(&src, vec![0xA5; 100])?;
    let srcdir = tmp.path().join("srcdir");
    fs::create_dir(&srcdir)?;
    fs::write(srcdir.join("a-long-enough-entry-name.txt"), b"x")?;
    let config = CopyConfig::new(4, 16)?;

    let before = open_descriptors()?;

    copy(&config, &src, &tmp.path().join("ok.bin"))?;
    assert_eq!(open_descriptors()?, before, "after successful copy");

    let err = copy(&config, &srcdir, &tmp.path().join("from-dir.bin")).unwrap_err();
    assert!(
        matches!(err, CopyError::Read { ref path, offset: 0, .. } if path == &srcdir),
        "got {err:?}"
    );
    assert_eq!(open_descriptors()?, before, "after read failure");

    let err = copy(&config, &src, Path::new("/dev/null")).unwrap_err();
    assert!(
        matches!(err, CopyError::Preallocate { size: 100, .. }),
        "got {err:?}"
    );
    assert_eq!(open_descriptors()?, before, "after preallocate failure");

    let err = copy(&config, &src, &tmp.path().join("missing").join("x.bin")).unwrap_err();
    assert!(matches!(err, CopyError::Open { .. }), "got {err:?}");
    assert_eq!(open_descriptors()?, before, "after destination open failure");
    Ok(())
}
