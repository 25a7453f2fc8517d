//! Loads observation feeds into [`ObservationFrame`]s, keeping a parquet copy
//! of every named feed in a local cache directory.

use crate::sources::error::SourceError;
use crate::sources::extractor::{dataframe_from_observations, normalize_schema};
use crate::types::observation::{DailyObservation, ObservationInput};
use crate::types::observation_frame::ObservationFrame;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir, sanitize_feed_name};
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Reads daily observation feeds from CSV, JSON or a URL.
///
/// Feeds are CSV with a header row holding at least `date` (ISO `YYYY-MM-DD`),
/// `temperature_min`, `temperature_max`, `humidity`, `cloud_cover` and
/// `pressure`. Other columns are ignored. A URL ending in `.gz` is
/// decompressed while downloading.
pub struct ObservationLoader {
    cache_dir: PathBuf,
    download_client: Client,
}

impl ObservationLoader {
    /// Creates a loader caching into the platform cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::CacheDirResolution`] if the platform has no cache directory.
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_cache_folder(get_cache_dir()?))
    }

    /// Creates a loader caching into `cache_dir`. The directory is created on first write.
    pub fn with_cache_folder(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            download_client: Client::new(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the parquet file backing `feed`.
    pub fn cache_path(&self, feed: &str) -> PathBuf {
        self.cache_dir
            .join(format!("feed-{}.parquet", sanitize_feed_name(feed)))
    }

    /// Returns the frame for `feed`, downloading it from `url` on a cache miss.
    ///
    /// A cached file that is not readable parquet counts as a miss and is
    /// replaced.
    ///
    /// # Arguments
    ///
    /// * `feed` - Cache key for this feed, e.g. a farm or station name.
    /// * `url` - Where to download the CSV from. Ignored when the feed is cached.
    ///
    /// # Errors
    ///
    /// Network, decompression, CSV and cache errors are returned as the matching
    /// [`SourceError`] variant.
    pub async fn fetch(&self, feed: &str, url: &str) -> Result<ObservationFrame, SourceError> {
        let parquet_path = self.cache_path(feed);

        if fs::metadata(&parquet_path).await.is_ok() {
            match Self::scan(&parquet_path) {
                Ok(frame) => {
                    info!("Cache hit for feed {} at {:?}", feed, parquet_path);
                    return Ok(frame);
                }
                Err(e) => warn!("Discarding unreadable cache for feed {}: {}", feed, e),
            }
        } else {
            warn!("Cache miss for feed {}. Downloading and processing.", feed);
        }

        let raw_bytes = self.download(url).await?;
        let df = Self::csv_to_dataframe(raw_bytes, feed).await?;
        self.store(feed, df).await?;
        Self::scan(&parquet_path)
    }

    /// Reads a local CSV feed and stores it in the cache under `feed`,
    /// replacing any earlier copy.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::FileRead`] if the file cannot be read, plus the CSV
    /// and cache errors of [`ObservationLoader::fetch`].
    pub async fn import_csv(
        &self,
        feed: &str,
        path: impl AsRef<Path>,
    ) -> Result<ObservationFrame, SourceError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| SourceError::FileRead(path.to_path_buf(), e))?;
        let df = Self::csv_to_dataframe(bytes, feed).await?;
        let parquet_path = self.store(feed, df).await?;
        Self::scan(&parquet_path)
    }

    /// Reads a local CSV feed without touching the cache.
    pub async fn read_csv(path: impl AsRef<Path>) -> Result<ObservationFrame, SourceError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| SourceError::FileRead(path.to_path_buf(), e))?;
        let feed = path.display().to_string();
        let df = Self::csv_to_dataframe(bytes, &feed).await?;
        Ok(ObservationFrame::new(df.lazy()))
    }

    /// Reads a JSON file holding one observation object or an array of them.
    pub async fn read_json(path: impl AsRef<Path>) -> Result<ObservationFrame, SourceError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| SourceError::FileRead(path.to_path_buf(), e))?;
        let input: ObservationInput = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::JsonParse(path.to_path_buf(), e))?;
        let days: Vec<DailyObservation> = match input {
            ObservationInput::Single(day) => vec![day],
            ObservationInput::Series(days) => days,
        };
        debug!("Read {} observations from {}", days.len(), path.display());
        Ok(ObservationFrame::new(dataframe_from_observations(&days)?.lazy()))
    }

    /// Removes the cached copy of `feed`. Returns `false` if nothing was cached.
    pub async fn clear_cache(&self, feed: &str) -> Result<bool, SourceError> {
        let parquet_path = self.cache_path(feed);
        match fs::remove_file(&parquet_path).await {
            Ok(()) => {
                info!("Removed cached feed {} at {:?}", feed, parquet_path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SourceError::CacheDeletion(parquet_path, e)),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => SourceError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => SourceError::NetworkRequest(url.to_string(), e),
                });
            }
        };

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let stream_reader = StreamReader::new(stream);
        let mut bytes = Vec::new();
        if url.ends_with(".gz") {
            GzipDecoder::new(stream_reader).read_to_end(&mut bytes).await?;
        } else {
            let mut reader = stream_reader;
            reader.read_to_end(&mut bytes).await?;
        }
        info!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }

    /// Parses CSV bytes with a header row on a blocking task.
    async fn csv_to_dataframe(bytes: Vec<u8>, feed: &str) -> Result<DataFrame, SourceError> {
        let feed_owned = feed.to_string();

        task::spawn_blocking(move || {
            let csv_io = |e| SourceError::CsvReadIo {
                feed: feed_owned.clone(),
                source: e,
            };
            let mut temp_file = NamedTempFile::new().map_err(csv_io)?;
            temp_file.write_all(&bytes).map_err(csv_io)?;
            temp_file.flush().map_err(csv_io)?;

            let csv_polars = |e| SourceError::CsvReadPolars {
                feed: feed_owned.clone(),
                source: e,
            };
            let df = CsvReadOptions::default()
                .with_has_header(true)
                .map_parse_options(|options| options.with_try_parse_dates(true))
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(csv_polars)?
                .finish()
                .map_err(csv_polars)?;

            normalize_schema(df, &feed_owned)
        })
        .await?
    }

    async fn store(&self, feed: &str, df: DataFrame) -> Result<PathBuf, SourceError> {
        ensure_cache_dir_exists(&self.cache_dir).await?;
        let parquet_path = self.cache_path(feed);
        Self::cache_dataframe(df, &parquet_path).await?;
        info!("Cached feed {} to {:?}", feed, parquet_path);
        Ok(parquet_path)
    }

    /// Writes the frame to a temporary file in the target directory, then
    /// renames it onto `path`.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), SourceError> {
        let path_buf = path.to_path_buf();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new_in(&dir)
                .map_err(|e| SourceError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(&mut temp_file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| SourceError::ParquetWritePolars(path_buf.clone(), e))?;
            temp_file
                .persist(&path_buf)
                .map_err(|e| SourceError::ParquetWriteIo(path_buf.clone(), e.error))?;
            Ok::<(), SourceError>(())
        })
        .await??;
        Ok(())
    }

    /// Opens a cached parquet file, reading its footer so a corrupt file fails here.
    fn scan(parquet_path: &Path) -> Result<ObservationFrame, SourceError> {
        let scan_error = |e| SourceError::ParquetScan(parquet_path.to_path_buf(), e);
        let mut frame = LazyFrame::scan_parquet(parquet_path, Default::default())
            .map_err(scan_error)?;
        frame.collect_schema().map_err(scan_error)?;
        Ok(ObservationFrame::new(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{august_week, AUGUST_WEEK_CSV};
    use async_compression::tokio::write::GzipEncoder;
    use std::error::Error;
    use tokio::io::{AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Answers a single HTTP request on a local port with `status` and `body`.
    /// Returns the base URL.
    async fn serve_once(status: &'static str, body: Vec<u8>) -> Result<String, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await?;
            let mut stream = BufReader::new(stream);
            let mut request = Vec::new();
            while !request.ends_with(b"\r\n\r\n") {
                let mut byte = [0u8; 1];
                if stream.read(&mut byte).await? == 0 {
                    break;
                }
                request.push(byte[0]);
            }
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let stream = stream.get_mut();
            stream.write_all(head.as_bytes()).await?;
            stream.write_all(&body).await?;
            stream.shutdown().await?;
            Ok::<(), std::io::Error>(())
        });
        Ok(base)
    }

    async fn gzip(bytes: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut encoder = GzipEncoder::new(Vec::new());
        encoder.write_all(bytes).await?;
        encoder.shutdown().await?;
        Ok(encoder.into_inner())
    }

    fn write_csv(dir: &Path, contents: &str) -> Result<PathBuf, std::io::Error> {
        let path = dir.join("week.csv");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    #[tokio::test]
    async fn test_read_csv() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = write_csv(dir.path(), AUGUST_WEEK_CSV)?;

        let frame = ObservationLoader::read_csv(&path).await?;
        assert_eq!(frame.collect_observations()?, august_week());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_csv_missing_column() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = write_csv(
            dir.path(),
            "date,temperature_min,temperature_max,humidity,cloud_cover\n2025-08-17,22,36.2,78,6\n",
        )?;

        let result = ObservationLoader::read_csv(&path).await;
        assert!(matches!(
            result,
            Err(SourceError::MissingColumn { ref column, .. }) if column == "pressure"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_import_then_fetch_hits_cache() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::with_cache_folder(dir.path().join("cache"));
        let csv = write_csv(dir.path(), AUGUST_WEEK_CSV)?;

        loader.import_csv("north field", &csv).await?;
        assert!(loader.cache_path("north field").is_file());

        // a cached feed never touches the network
        let frame = loader
            .fetch("north field", "http://127.0.0.1:9/unused.csv")
            .await?;
        assert_eq!(frame.height()?, 5);

        assert!(loader.clear_cache("north field").await?);
        assert!(!loader.clear_cache("north field").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_unreachable() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::with_cache_folder(dir.path().to_path_buf());

        let result = loader.fetch("remote", "http://127.0.0.1:9/week.csv").await;
        assert!(matches!(result, Err(SourceError::NetworkRequest(..))));
        assert!(!loader.cache_path("remote").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_json() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("week.json");
        std::fs::write(&path, serde_json::to_string(&august_week())?)?;

        let frame = ObservationLoader::read_json(&path).await?;
        assert_eq!(frame.collect_observations()?, august_week());

        std::fs::write(&path, "{\"date\": \"2025-08-17\"}")?;
        assert!(matches!(
            ObservationLoader::read_json(&path).await,
            Err(SourceError::JsonParse(..))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_downloads_and_caches() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::with_cache_folder(dir.path().join("cache"));
        let base = serve_once("200 OK", AUGUST_WEEK_CSV.as_bytes().to_vec()).await?;

        let frame = loader.fetch("plain", &format!("{}/week.csv", base)).await?;
        assert_eq!(frame.collect_observations()?, august_week());
        assert!(loader.cache_path("plain").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_decompresses_gz() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::with_cache_folder(dir.path().to_path_buf());
        let base = serve_once("200 OK", gzip(AUGUST_WEEK_CSV.as_bytes()).await?).await?;

        let frame = loader.fetch("packed", &format!("{}/week.csv.gz", base)).await?;
        assert_eq!(frame.collect_observations()?, august_week());
        assert!(loader.cache_path("packed").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::with_cache_folder(dir.path().to_path_buf());
        let base = serve_once("404 Not Found", Vec::new()).await?;

        let result = loader.fetch("gone", &format!("{}/week.csv", base)).await;
        assert!(matches!(
            result,
            Err(SourceError::HttpStatus { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert!(!loader.cache_path("gone").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_replaced() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::with_cache_folder(dir.path().to_path_buf());
        std::fs::write(loader.cache_path("north"), b"not parquet")?;

        // an unreadable cache is not served as a hit
        let result = loader.fetch("north", "http://127.0.0.1:9/week.csv").await;
        assert!(matches!(result, Err(SourceError::NetworkRequest(..))));

        let base = serve_once("200 OK", AUGUST_WEEK_CSV.as_bytes().to_vec()).await?;
        let frame = loader.fetch("north", &format!("{}/week.csv", base)).await?;
        assert_eq!(frame.height()?, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_csv_rejects_blank_cell() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = write_csv(
            dir.path(),
            "date,temperature_min,temperature_max,humidity,cloud_cover,pressure
2025-08-17,22.0,36.2,78,6,1012.5
2025-08-18,23.1,28.5,,45,1010.2
2025-08-19,22.4,27.9,88,72,1008.7
",
        )?;

        let result = ObservationLoader::read_csv(&path).await;
        assert!(matches!(
            result,
            Err(SourceError::MissingValue { row: 1, ref column }) if column == "humidity"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_read_csv_rejects_text_value() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = write_csv(
            dir.path(),
            "date,temperature_min,temperature_max,humidity,cloud_cover,pressure
2025-08-17,22.0,36.2,78,6,1012.5
2025-08-18,23.1,28.5,n/a,45,1010.2
",
        )?;

        let result = ObservationLoader::read_csv(&path).await;
        assert!(matches!(result, Err(SourceError::SchemaMismatch { .. })));
        Ok(())
    }
}
