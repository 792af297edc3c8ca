// Flat upload directory shared by complaint attachments and report files

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Largest accepted attachment, per file.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const MAX_NAME_ATTEMPTS: usize = 16;

#[derive(Clone, Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {e}")))?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }

    pub async fn exists(&self, filename: &str) -> bool {
        fs::try_exists(self.path(filename)).await.unwrap_or(false)
    }

    /// Writes `data` under a freshly generated name and returns that name.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.store_at(original_name, data, Utc::now().timestamp_millis(), &mut rng)
            .await
    }

    /// Never replaces an existing file; a taken name is redrawn.
    async fn store_at<R: Rng + Send>(
        &self,
        original_name: &str,
        data: &[u8],
        millis: i64,
        rng: &mut R,
    ) -> Result<String> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = unique_filename(original_name, millis, rng);
            let opened = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.path(&filename))
                .await;

            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(%filename, "Upload name taken, drawing another");
                    continue;
                }
                Err(e) => return Err(write_error(e)),
            };
            file.write_all(data).await.map_err(write_error)?;
            file.flush().await.map_err(write_error)?;

            tracing::info!(%filename, original = original_name, bytes = data.len(), "Stored upload");
            return Ok(filename);
        }

        Err(AppError::Internal(
            "No free upload name after repeated attempts".to_string(),
        ))
    }

    /// A path for a short-lived artifact that no other request can pick.
    pub fn temp_path(&self, prefix: &str, extension: &str) -> PathBuf {
        self.base_path
            .join(format!("{prefix}-{}.{extension}", Uuid::new_v4()))
    }
}

fn write_error(e: std::io::Error) -> AppError {
    AppError::Internal(format!("Failed to write upload: {e}"))
}

/// `<millis>-<random>` plus the original extension, if there was one.
pub fn unique_filename<R: Rng>(original_name: &str, millis: i64, rng: &mut R) -> String {
    let suffix: u32 = rng.random_range(0..1_000_000_000);
    match Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{millis}-{suffix}.{ext}"),
        None => format!("{millis}-{suffix}"),
    }
}
