//! Archive downloads.
//!
//! Archives are streamed to `<dest>.tmp` and renamed into place once the body
//! has been written completely, so `dest` never holds a truncated archive.
//! Requests are made once: there are no retries and no timeouts, a stalled
//! transfer has to be interrupted by the user.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use super::catalog::USER_AGENT;
use crate::errors::GoverError;

/// Progress event emitted during downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Response headers arrived.
    Started {
        /// Total size from `Content-Length`, 0 when unknown.
        total: u64,
    },
    /// A chunk was written.
    Progress {
        /// Bytes downloaded so far. Never decreases.
        downloaded: u64,
        /// Average speed in bytes per second.
        speed: u64,
    },
    /// The archive is in place.
    Completed,
}

/// Callback type for receiving progress updates during downloads.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Fetches archives to local files.
pub trait ArchiveFetcher {
    /// Downloads `url` to `dest`, reporting progress to `callback`.
    async fn fetch(&self, url: &str, dest: &Path, callback: ProgressCallback) -> Result<()>;
}

/// Downloads archives over HTTP(S).
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl ArchiveFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path, callback: ProgressCallback) -> Result<()> {
        download_file_with_callback(url, dest, callback).await
    }
}

/// Minimum interval between progress callback invocations in milliseconds.
const PROGRESS_CALLBACK_INTERVAL_MS: u128 = 100;

/// Downloads a file with progress callbacks.
///
/// # Errors
///
/// Returns [`GoverError::DownloadFailed`] if the server cannot be reached,
/// answers with a non-success status or the body stream breaks. Local I/O
/// failures are returned with context.
pub async fn download_file_with_callback(
    url: &str,
    dest: &Path,
    callback: ProgressCallback,
) -> Result<()> {
    let temp_path = temp_path(dest);

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if let Err(e) = download_with_callback(url, &temp_path, &callback).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, dest).await.with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            dest.display()
        )
    })?;
    callback(ProgressEvent::Completed);
    Ok(())
}

/// Returns `dest` with `.tmp` appended to its file name.
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

async fn download_with_callback(url: &str, dest: &Path, callback: &ProgressCallback) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| GoverError::download_failed(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GoverError::download_failed(url, status.to_string()).into());
    }

    let total = response.content_length().unwrap_or(0);
    callback(ProgressEvent::Started { total });

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create file: {}", dest.display()))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let start_time = Instant::now();
    let mut last_update = Instant::now();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| GoverError::download_failed(url, e.to_string()))?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write to {}", dest.display()))?;
        downloaded += chunk.len() as u64;

        let now = Instant::now();
        if now.duration_since(last_update).as_millis() >= PROGRESS_CALLBACK_INTERVAL_MS {
            callback(ProgressEvent::Progress {
                downloaded,
                speed: average_speed(downloaded, start_time.elapsed().as_secs_f64()),
            });
            last_update = now;
        }
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", dest.display()))?;

    callback(ProgressEvent::Progress {
        downloaded,
        speed: average_speed(downloaded, start_time.elapsed().as_secs_f64()),
    });

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn average_speed(downloaded: u64, elapsed_secs: f64) -> u64 {
    if elapsed_secs > 0.0 {
        (downloaded as f64 / elapsed_secs) as u64
    } else {
        0
    }
}

/// Progress callback that draws a single-line meter on stderr.
#[must_use]
pub fn console_progress() -> ProgressCallback {
    let total = Arc::new(std::sync::atomic::AtomicU64::new(0));
    Arc::new(move |event: ProgressEvent| {
        use std::sync::atomic::Ordering;

        let mut stderr = std::io::stderr();
        match event {
            ProgressEvent::Started { total: size } => total.store(size, Ordering::Relaxed),
            ProgressEvent::Progress { downloaded, speed } => {
                let size = total.load(Ordering::Relaxed);
                let _ = write!(stderr, "\r{}", progress_line(downloaded, size, speed));
            }
            ProgressEvent::Completed => {
                let _ = writeln!(stderr);
            }
        }
        let _ = stderr.flush();
    })
}

#[allow(clippy::cast_possible_truncation)]
fn progress_line(downloaded: u64, total: u64, speed: u64) -> String {
    let speed_str = format_speed(speed);
    let downloaded_str = format_bytes(downloaded);
    if total > 0 {
        let percent = (downloaded.min(total) * 100 / total) as u8;
        let total_str = format_bytes(total);
        format!("{downloaded_str}/{total_str} ({percent}%) {speed_str}     ")
    } else {
        format!("{downloaded_str} {speed_str}     ")
    }
}

/// Formats bytes into a human-readable string (KB, MB, GB).
fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;

    if bytes_f >= GB {
        format!("{:.2} GB", bytes_f / GB)
    } else if bytes_f >= MB {
        format!("{:.2} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.2} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Formats speed (bytes/sec) into a human-readable string.
fn format_speed(speed: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let speed = speed as f64;

    if speed >= MB {
        format!("{:.2} MB/s", speed / MB)
    } else if speed >= KB {
        format!("{:.2} KB/s", speed / KB)
    } else {
        format!("{speed:.0} B/s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use std::sync::Mutex;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn format_speed_units() {
        assert_eq!(format_speed(100), "100 B/s");
        assert_eq!(format_speed(1536), "1.50 KB/s");
        assert_eq!(format_speed(2 * 1024 * 1024), "2.00 MB/s");
    }

    #[test]
    fn progress_line_with_and_without_total() {
        assert_eq!(
            progress_line(512, 1024, 0),
            "512 B/1.00 KB (50%) 0 B/s     "
        );
        assert_eq!(progress_line(512, 0, 0), "512 B 0 B/s     ");
    }

    #[test]
    fn temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("/d/go1.21.4.linux-amd64.tar.gz")),
            PathBuf::from("/d/go1.21.4.linux-amd64.tar.gz.tmp")
        );
    }

    #[test]
    fn average_speed_handles_zero_elapsed() {
        assert_eq!(average_speed(1000, 0.0), 0);
        assert_eq!(average_speed(1000, 2.0), 500);
    }

    #[tokio::test]
    async fn unreachable_server_is_download_failed() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("downloads").join("go1.21.4.linux-amd64.tar.gz");
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressCallback =
            Arc::new(move |event: ProgressEvent| sink.lock().unwrap().push(event));

        let err = download_file_with_callback(
            "http://127.0.0.1:1/go1.21.4.linux-amd64.tar.gz",
            &dest,
            callback,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GoverError>(),
            Some(GoverError::DownloadFailed { .. })
        ));
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
        assert!(events.lock().unwrap().is_empty());
    }

    /// Serves one request with `response` and returns the base URL.
    fn serve_once(response: &'static str) -> String {
        use std::io::Read;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn error_status_is_download_failed() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("go1.99.0.linux-amd64.tar.gz");
        let base =
            serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");

        let err = download_file_with_callback(
            &format!("{base}/go1.99.0.linux-amd64.tar.gz"),
            &dest,
            Arc::new(|_: ProgressEvent| {}),
        )
        .await
        .unwrap_err();

        match err.downcast_ref::<GoverError>() {
            Some(GoverError::DownloadFailed { status, .. }) => {
                assert!(status.contains("404 Not Found"), "status: {status}");
            }
            other => panic!("expected DownloadFailed, got {other:?}"),
        }
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }
}
