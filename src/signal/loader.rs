use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use ndarray::{ArrayD, IxDyn, OwnedRepr};
use ndarray_npy::{NpzReader, ReadNpyError, ReadNpzError};
use crate::signal::SignalError;
pub const CHANNEL_1_KEY: &str = "raw_data_ch1";
pub const CHANNEL_2_KEY: &str = "raw_data_ch2";
pub const TIME_KEY: &str = "time";
pub const SAMPLING_FREQUENCY_KEY: &str = "sampling_frequency";
pub const ARCHIVE_EXTENSION: &str = ".npz";
/// Two raw channels plus their time base, as stored in one archive.
#[derive(Clone, Debug)]
pub struct Recording {
    pub time: Vec<f64>,
    pub channel1: Vec<f64>,
    pub channel2: Vec<f64>,
    pub sampling_frequency_hz: f64,
}
impl Recording {
    /// Resolves the time base and checks the length/monotonicity invariants.
    ///
    /// An explicit `time` array wins and implies `time_array_rate_hz`; otherwise
    /// `sampling_frequency` is used to synthesize `time[i] = i / fs`.
    pub fn from_arrays(
        channel1: Vec<f64>,
        channel2: Vec<f64>,
        time: Option<Vec<f64>>,
        sampling_frequency_hz: Option<f64>,
        time_array_rate_hz: f64,
    ) -> Result<Self, SignalError> {
        let (time, fs) = match (time, sampling_frequency_hz) {
            (Some(time), _) => (time, time_array_rate_hz),
            (None, Some(fs)) => {
                if !fs.is_finite() || fs <= 0.0 {
                    return Err(SignalError::InvalidSampleRate(fs));
                }
                let time = (0..channel1.len()).map(|i| i as f64 / fs).collect();
                (time, fs)
            }
            (None, None) => return Err(SignalError::MissingTimeInfo),
        };
        let recording = Self {
            time,
            channel1,
            channel2,
            sampling_frequency_hz: fs,
        };
        recording.validate()?;
        Ok(recording)
    }
    pub fn validate(&self) -> Result<(), SignalError> {
        if !self.sampling_frequency_hz.is_finite() || self.sampling_frequency_hz <= 0.0 {
            return Err(SignalError::InvalidSampleRate(self.sampling_frequency_hz));
        }
        let expected = self.channel1.len();
        if self.channel2.len() != expected {
            return Err(SignalError::LengthMismatch {
                name: CHANNEL_2_KEY,
                expected,
                actual: self.channel2.len(),
            });
        }
        if self.time.len() != expected {
            return Err(SignalError::LengthMismatch {
                name: TIME_KEY,
                expected,
                actual: self.time.len(),
            });
        }
        if let Some(idx) = self.time.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(SignalError::NonMonotonicTime(idx + 1));
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.channel1.len()
    }
    pub fn is_empty(&self) -> bool {
        self.channel1.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sampling_frequency_hz
    }
}
/// Reads `raw_data_ch1`, `raw_data_ch2` and the time base from an `.npz` archive.
pub fn load_archive(path: &Path, time_array_rate_hz: f64) -> Result<Recording, SignalError> {
    let file = BufReader::new(File::open(path)?);
    let mut npz = NpzReader::new(file)?;
    let names = npz.names()?;
    log::debug!("{} contains arrays {:?}", path.display(), names);
    let channel1 = read_vector(&mut npz, &names, CHANNEL_1_KEY)?
        .ok_or_else(|| SignalError::MissingArray(CHANNEL_1_KEY.into()))?;
    let channel2 = read_vector(&mut npz, &names, CHANNEL_2_KEY)?
        .ok_or_else(|| SignalError::MissingArray(CHANNEL_2_KEY.into()))?;
    let time = read_vector(&mut npz, &names, TIME_KEY)?;
    let sampling_frequency = match time {
        Some(_) => None,
        None => read_scalar(&mut npz, &names, SAMPLING_FREQUENCY_KEY)?,
    };
    let recording = Recording::from_arrays(
        channel1,
        channel2,
        time,
        sampling_frequency,
        time_array_rate_hz,
    )?;
    log::info!(
        "loaded {}: {} samples/channel at {} Hz ({:.1} s)",
        path.display(),
        recording.len(),
        recording.sampling_frequency_hz,
        recording.duration_seconds()
    );
    Ok(recording)
}
/// Matches an archive member with or without its `.npy` suffix.
fn resolve_entry<'a>(names: &'a [String], key: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|name| name.as_str() == key || name.strip_suffix(".npy") == Some(key))
        .map(String::as_str)
}
fn read_array<R: Read + Seek>(
    npz: &mut NpzReader<R>,
    entry: &str,
) -> Result<ArrayD<f64>, SignalError> {
    macro_rules! read_as {
        ($($ty:ty),*) => {
            $(
                match npz.by_name::<OwnedRepr<$ty>, IxDyn>(entry) {
                    Ok(array) => return Ok(array.mapv(|v| v as f64)),
                    Err(err) if is_dtype_mismatch(&err) => {
                        log::trace!("{entry} is not {}: {err}", stringify!($ty))
                    }
                    Err(err) => return Err(err.into()),
                }
            )*
        };
    }
    read_as!(f64, f32, i64, i32, i16, u16, u8);
    Err(SignalError::UnsupportedArray {
        name: entry.to_owned(),
    })
}
/// Only a descriptor mismatch means "try the next element type".
fn is_dtype_mismatch(err: &ReadNpzError) -> bool {
    matches!(err, ReadNpzError::Npy(ReadNpyError::WrongDescriptor(_)))
}
fn read_vector<R: Read + Seek>(
    npz: &mut NpzReader<R>,
    names: &[String],
    key: &str,
) -> Result<Option<Vec<f64>>, SignalError> {
    let Some(entry) = resolve_entry(names, key) else {
        return Ok(None);
    };
    let array = read_array(npz, entry)?;
    // Accept (n,), (1, n), (n, 1); anything with two real axes is not a channel.
    if array.shape().iter().filter(|&&dim| dim > 1).count() > 1 {
        return Err(SignalError::UnsupportedArray { name: key.into() });
    }
    Ok(Some(array.iter().copied().collect()))
}
fn read_scalar<R: Read + Seek>(
    npz: &mut NpzReader<R>,
    names: &[String],
    key: &str,
) -> Result<Option<f64>, SignalError> {
    let Some(entry) = resolve_entry(names, key) else {
        return Ok(None);
    };
    let array = read_array(npz, entry)?;
    if array.len() != 1 {
        return Err(SignalError::UnsupportedArray { name: key.into() });
    }
    Ok(array.iter().next().copied())
}
/// One selectable archive in a folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// 1-based position in the sorted listing.
    pub index: usize,
    pub file_name: String,
    pub path: PathBuf,
}
impl ArchiveEntry {
    pub fn label(&self) -> String {
        format!("({}) {}", self.index, self.file_name)
    }
}
/// Lists `.npz` files in `folder`, sorted by file name and numbered from 1.
pub fn list_archives(folder: &Path) -> Result<Vec<ArchiveEntry>, SignalError> {
    let mut names: Vec<String> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(ARCHIVE_EXTENSION))
        .collect();
    names.sort();
    Ok(names
        .into_iter()
        .enumerate()
        .map(|(idx, file_name)| ArchiveEntry {
            index: idx + 1,
            path: folder.join(&file_name),
            file_name,
        })
        .collect())
}
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ndarray::{arr0, Array1};
    use ndarray_npy::NpzWriter;
    /// Fresh, empty scratch directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nvc_viewer_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
    pub(crate) fn write_archive(path: &Path, arrays: &[(&str, Vec<f64>)], fs_scalar: Option<f64>) {
        let mut npz = NpzWriter::new(File::create(path).unwrap());
        for (name, values) in arrays {
            npz.add_array(*name, &Array1::from(values.clone())).unwrap();
        }
        if let Some(fs) = fs_scalar {
            npz.add_array(SAMPLING_FREQUENCY_KEY, &arr0(fs)).unwrap();
        }
        npz.finish().unwrap();
    }
    #[test]
    fn integer_arrays_are_widened() {
        let dir = scratch_dir("integer_dtypes");
        let path = dir.join("rec.npz");
        let mut npz = NpzWriter::new(File::create(&path).unwrap());
        npz.add_array(CHANNEL_1_KEY, &Array1::from(vec![-3i16, 0, 7, 32_000]))
            .unwrap();
        npz.add_array(CHANNEL_2_KEY, &Array1::from(vec![1.5f32, 2.5, -0.25, 4.0]))
            .unwrap();
        npz.add_array(SAMPLING_FREQUENCY_KEY, &arr0(1000i64)).unwrap();
        npz.finish().unwrap();
        let rec = load_archive(&path, 30_000.0).unwrap();
        assert_eq!(rec.channel1, vec![-3.0, 0.0, 7.0, 32_000.0]);
        assert_eq!(rec.channel2, vec![1.5, 2.5, -0.25, 4.0]);
        assert_eq!(rec.sampling_frequency_hz, 1000.0);
        assert_eq!(rec.time, vec![0.0, 0.001, 0.002, 0.003]);
    }
    #[test]
    fn bool_array_is_unsupported() {
        let dir = scratch_dir("bool_dtype");
        let path = dir.join("rec.npz");
        let mut npz = NpzWriter::new(File::create(&path).unwrap());
        npz.add_array(CHANNEL_1_KEY, &Array1::from(vec![true, false])).unwrap();
        npz.add_array(CHANNEL_2_KEY, &Array1::from(vec![1.0f64, 2.0])).unwrap();
        npz.add_array(SAMPLING_FREQUENCY_KEY, &arr0(10.0f64)).unwrap();
        npz.finish().unwrap();
        let err = load_archive(&path, 30_000.0).unwrap_err();
        assert!(matches!(
            err,
            SignalError::UnsupportedArray { name } if name.starts_with(CHANNEL_1_KEY)
        ));
    }
    #[test]
    fn only_descriptor_errors_fall_through() {
        let missing = ReadNpzError::Npy(ReadNpyError::MissingData);
        assert!(!is_dtype_mismatch(&missing));
        let io = ReadNpzError::Npy(ReadNpyError::Io(std::io::ErrorKind::UnexpectedEof.into()));
        assert!(!is_dtype_mismatch(&io));
    }
    #[test]
    fn time_array_implies_fixed_native_rate() {
        let dir = scratch_dir("time_array");
        let path = dir.join("rec.npz");
        let time = vec![0.0, 0.5, 1.0, 1.5];
        write_archive(
            &path,
            &[
                (CHANNEL_1_KEY, vec![1.0, 2.0, 3.0, 4.0]),
                (CHANNEL_2_KEY, vec![4.0, 3.0, 2.0, 1.0]),
                (TIME_KEY, time.clone()),
            ],
            Some(1000.0),
        );
        let rec = load_archive(&path, 30_000.0).unwrap();
        assert_eq!(rec.sampling_frequency_hz, 30_000.0);
        assert_eq!(rec.time, time);
        assert_eq!(rec.channel2, vec![4.0, 3.0, 2.0, 1.0]);
    }
    #[test]
    fn sampling_frequency_synthesizes_time() {
        let dir = scratch_dir("fs_scalar");
        let path = dir.join("rec.npz");
        let n = 1000;
        write_archive(
            &path,
            &[
                (CHANNEL_1_KEY, vec![0.0; n]),
                (CHANNEL_2_KEY, vec![1.0; n]),
            ],
            Some(2048.0),
        );
        let rec = load_archive(&path, 30_000.0).unwrap();
        assert_eq!(rec.sampling_frequency_hz, 2048.0);
        assert_eq!(rec.time.len(), n);
        for (i, t) in rec.time.iter().enumerate() {
            assert_eq!(*t, i as f64 / 2048.0);
        }
    }
    #[test]
    fn archive_without_time_info_is_rejected() {
        let dir = scratch_dir("no_time");
        let path = dir.join("rec.npz");
        write_archive(
            &path,
            &[
                (CHANNEL_1_KEY, vec![0.0; 10]),
                (CHANNEL_2_KEY, vec![0.0; 10]),
            ],
            None,
        );
        let err = load_archive(&path, 30_000.0).unwrap_err();
        assert!(matches!(err, SignalError::MissingTimeInfo));
    }
    #[test]
    fn missing_channel_is_reported_by_name() {
        let dir = scratch_dir("no_ch2");
        let path = dir.join("rec.npz");
        write_archive(&path, &[(CHANNEL_1_KEY, vec![0.0; 10])], Some(100.0));
        match load_archive(&path, 30_000.0) {
            Err(SignalError::MissingArray(name)) => assert_eq!(name, CHANNEL_2_KEY),
            other => panic!("unexpected result: {other:?}"),
        }
    }
    #[test]
    fn channel_length_mismatch_is_rejected() {
        let err = Recording::from_arrays(vec![0.0; 4], vec![0.0; 3], None, Some(10.0), 30_000.0)
            .unwrap_err();
        assert!(matches!(
            err,
            SignalError::LengthMismatch { expected: 4, actual: 3, .. }
        ));
    }
    #[test]
    fn decreasing_time_is_rejected() {
        let err = Recording::from_arrays(
            vec![0.0; 3],
            vec![0.0; 3],
            Some(vec![0.0, 2.0, 1.0]),
            None,
            30_000.0,
        )
        .unwrap_err();
        assert!(matches!(err, SignalError::NonMonotonicTime(2)));
    }
    #[test]
    fn zero_sampling_frequency_is_rejected() {
        let err = Recording::from_arrays(vec![0.0; 3], vec![0.0; 3], None, Some(0.0), 30_000.0)
            .unwrap_err();
        assert!(matches!(err, SignalError::InvalidSampleRate(_)));
    }
    #[test]
    fn listing_is_sorted_and_numbered() {
        let dir = scratch_dir("listing");
        for name in ["b.npz", "a.npz", "notes.txt", "c.npz.bak", "10.npz"] {
            File::create(dir.join(name)).unwrap();
        }
        let entries = list_archives(&dir).unwrap();
        let labels: Vec<String> = entries.iter().map(ArchiveEntry::label).collect();
        assert_eq!(labels, vec!["(1) 10.npz", "(2) a.npz", "(3) b.npz"]);
        assert_eq!(entries[1].path, dir.join("a.npz"));
    }
}
