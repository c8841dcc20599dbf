use crate::media::MediaRelocator;
use std::fs;
use tempfile::TempDir;

pub(crate) static PHOTO_DATA: &[u8] = b"\x89PNG\r\n\x1a\nnot really a photo";

/// Temp dir with `Media/photo one.png` and a relocator writing to `out/media`
pub(crate) fn create_media_dirs() -> Result<(TempDir, MediaRelocator), std::io::Error> {
    let temp_dir = TempDir::new()?;
    let media = temp_dir.path().join("Media");

    fs::create_dir(&media)?;
    fs::write(media.join("photo one.png"), PHOTO_DATA)?;

    #[cfg(feature = "tracing")]
    tracing::debug!("Created media dirs in: {}", temp_dir.path().display());

    let relocator = MediaRelocator::new(&media, temp_dir.path().join("out").join("media"));
    Ok((temp_dir, relocator))
}

#[must_use]
pub(crate) fn is_error<E>(error: &(impl std::error::Error + 'static)) -> bool
where
    E: std::error::Error + 'static,
{
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        if err.downcast_ref::<E>().is_some() {
            return true;
        }

        source = err.source();
    }

    false
}
