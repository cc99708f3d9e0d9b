//! Agent-side log collection (spec §4.5 "Agent side"). Each source tracks
//! its own cursor under `auth_dir/log-cursors.<source>` so a crash or
//! restart resumes exactly where it left off instead of re-shipping or
//! silently dropping entries.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::Command;

use rackwatch_core::wire::{LogEntryDto, LogSourceDto};

use crate::types::{AgentRuntimeError, AgentRuntimeResult};

/// Bounded backfill on first run, so an agent with years of history
/// doesn't ship it all in one batch (spec §4.5 step 3).
const FIRST_RUN_BACKFILL_LINES: usize = 1000;

pub trait LogSource: Send {
    fn source(&self) -> LogSourceDto;
    /// Collects everything new since the last persisted cursor and
    /// advances it on success; leaves the cursor untouched on error so the
    /// next cycle retries (spec §4.5 step 4).
    fn poll(&mut self) -> AgentRuntimeResult<Vec<LogEntryDto>>;
}

fn load_cursor(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn save_cursor(path: &Path, value: &str) -> AgentRuntimeResult<()> {
    fs::write(path, value)?;
    Ok(())
}

/// Tracks file inode + byte offset; resets to 0 on rotation or truncation
/// (spec §4.5 step 2 "syslog file").
pub struct SyslogFileSource {
    log_path: PathBuf,
    cursor_path: PathBuf,
}

impl SyslogFileSource {
    pub fn new(log_path: impl Into<PathBuf>, cursor_path: impl Into<PathBuf>) -> Self {
        Self { log_path: log_path.into(), cursor_path: cursor_path.into() }
    }

    fn file_inode(metadata: &fs::Metadata) -> u64 {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            metadata.ino()
        }
        #[cfg(not(unix))]
        {
            let _ = metadata;
            0
        }
    }
}

impl LogSource for SyslogFileSource {
    fn source(&self) -> LogSourceDto {
        LogSourceDto::Syslog
    }

    fn poll(&mut self) -> AgentRuntimeResult<Vec<LogEntryDto>> {
        let metadata = match fs::metadata(&self.log_path) {
            Ok(m) => m,
            Err(_) => return Ok(Vec::new()),
        };
        let inode = Self::file_inode(&metadata);
        let size = metadata.len();

        let stored = load_cursor(&self.cursor_path);
        let first_run = stored.is_none();
        let (stored_inode, stored_offset) = stored
            .as_deref()
            .and_then(|s| s.split_once(':'))
            .and_then(|(i, o)| Some((i.parse::<u64>().ok()?, o.parse::<u64>().ok()?)))
            .unwrap_or((inode, 0));

        let rotated = stored_inode != inode || size < stored_offset;
        let start_offset = if first_run || rotated { 0 } else { stored_offset };

        let mut file = fs::File::open(&self.log_path)?;
        file.seek(SeekFrom::Start(start_offset))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let mut lines: Vec<&str> = contents.lines().collect();
        if first_run && lines.len() > FIRST_RUN_BACKFILL_LINES {
            let skip = lines.len() - FIRST_RUN_BACKFILL_LINES;
            lines = lines.split_off(skip);
        }

        let entries = lines.iter().map(|line| parse_syslog_line(line)).collect();

        save_cursor(&self.cursor_path, &format!("{inode}:{size}"))?;
        Ok(entries)
    }
}

/// Best-effort parse of a traditional `<severity tag> message` syslog
/// line; lines that don't match a recognized prefix are stored verbatim
/// at the default "info" severity rather than dropped.
fn parse_syslog_line(line: &str) -> LogEntryDto {
    let severity = infer_severity(line);
    LogEntryDto {
        source: LogSourceDto::Syslog,
        timestamp_utc_sec: chrono::Utc::now().timestamp(),
        severity,
        message: line.to_string(),
        unit: None,
        identifier: None,
        pid: None,
    }
}

fn infer_severity(line: &str) -> u8 {
    let lower = line.to_ascii_lowercase();
    if lower.contains("emerg") {
        0
    } else if lower.contains("alert") {
        1
    } else if lower.contains("crit") {
        2
    } else if lower.contains("error") || lower.contains("err:") {
        3
    } else if lower.contains("warn") {
        4
    } else if lower.contains("notice") {
        5
    } else if lower.contains("debug") {
        7
    } else {
        6
    }
}

/// `/dev/kmsg` record: `priority,sequence,timestamp_usec,flags;message`.
/// `priority = facility*8 + severity`; we only need the low 3 bits.
pub trait KernelLogReader: Send {
    fn read_all(&mut self) -> std::io::Result<Vec<(u64, i64, u8, String)>>;
    fn boot_time_utc(&self) -> std::io::Result<i64>;
}

pub struct ProcKmsgReader;

impl KernelLogReader for ProcKmsgReader {
    fn read_all(&mut self) -> std::io::Result<Vec<(u64, i64, u8, String)>> {
        let contents = fs::read_to_string("/dev/kmsg")?;
        Ok(contents.lines().filter_map(parse_kmsg_line).collect())
    }

    fn boot_time_utc(&self) -> std::io::Result<i64> {
        let stat = fs::read_to_string("/proc/stat")?;
        for line in stat.lines() {
            if let Some(rest) = line.strip_prefix("btime ") {
                if let Ok(v) = rest.trim().parse::<i64>() {
                    return Ok(v);
                }
            }
        }
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "btime not found in /proc/stat"))
    }
}

fn parse_kmsg_line(line: &str) -> Option<(u64, i64, u8, String)> {
    let (header, message) = line.split_once(';')?;
    let mut fields = header.split(',');
    let priority: u32 = fields.next()?.parse().ok()?;
    let sequence: u64 = fields.next()?.parse().ok()?;
    let timestamp_usec: i64 = fields.next()?.parse().ok()?;
    let severity = (priority % 8) as u8;
    Some((sequence, timestamp_usec, severity, message.to_string()))
}

pub struct KernelRingBufferSource {
    cursor_path: PathBuf,
    reader: Box<dyn KernelLogReader>,
}

impl KernelRingBufferSource {
    pub fn new(cursor_path: impl Into<PathBuf>, reader: Box<dyn KernelLogReader>) -> Self {
        Self { cursor_path: cursor_path.into(), reader }
    }
}

impl LogSource for KernelRingBufferSource {
    fn source(&self) -> LogSourceDto {
        LogSourceDto::Kernel
    }

    fn poll(&mut self) -> AgentRuntimeResult<Vec<LogEntryDto>> {
        let boot_time_utc = self
            .reader
            .boot_time_utc()
            .map_err(|e| AgentRuntimeError::LogSource { source: "kernel".to_string(), reason: e.to_string() })?;

        let records = self
            .reader
            .read_all()
            .map_err(|e| AgentRuntimeError::LogSource { source: "kernel".to_string(), reason: e.to_string() })?;

        let last_seen: u64 = load_cursor(&self.cursor_path).and_then(|s| s.parse().ok()).unwrap_or(0);
        let mut max_sequence = last_seen;

        let entries: Vec<LogEntryDto> = records
            .into_iter()
            .filter(|(sequence, ..)| *sequence > last_seen)
            .map(|(sequence, timestamp_usec, severity, message)| {
                max_sequence = max_sequence.max(sequence);
                LogEntryDto {
                    source: LogSourceDto::Kernel,
                    timestamp_utc_sec: boot_time_utc + timestamp_usec / 1_000_000,
                    severity,
                    message,
                    unit: None,
                    identifier: None,
                    pid: None,
                }
            })
            .collect();

        save_cursor(&self.cursor_path, &max_sequence.to_string())?;
        Ok(entries)
    }
}

/// `journalctl -o json --since <cursor>` wrapped behind a trait so tests
/// can substitute a fake reader instead of shelling out to `journalctl`.
pub trait JournalReader: Send {
    fn entries_since(&mut self, after_realtime_usec: Option<i64>) -> std::io::Result<Vec<JournalRecord>>;
}

#[derive(Debug, Clone)]
pub struct JournalRecord {
    pub realtime_usec: i64,
    pub unit: Option<String>,
    pub identifier: Option<String>,
    pub pid: Option<i64>,
    pub priority: u8,
    pub message: String,
}

pub struct SystemdJournalReader;

impl JournalReader for SystemdJournalReader {
    fn entries_since(&mut self, after_realtime_usec: Option<i64>) -> std::io::Result<Vec<JournalRecord>> {
        let mut cmd = Command::new("journalctl");
        cmd.arg("-o").arg("json").arg("--no-pager");
        if let Some(cursor) = after_realtime_usec {
            cmd.arg("--since").arg(format!("@{}", cursor / 1_000_000));
        }
        let output = cmd.output()?;
        let text = String::from_utf8_lossy(&output.stdout);

        let records = text
            .lines()
            .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .filter_map(journal_value_to_record)
            .filter(|r| after_realtime_usec.map(|cursor| r.realtime_usec > cursor).unwrap_or(true))
            .collect();
        Ok(records)
    }
}

fn journal_value_to_record(v: serde_json::Value) -> Option<JournalRecord> {
    let realtime_usec = v.get("__REALTIME_TIMESTAMP")?.as_str()?.parse::<i64>().ok()?;
    let message = v.get("MESSAGE")?.as_str()?.to_string();
    let priority = v.get("PRIORITY").and_then(|p| p.as_str()).and_then(|p| p.parse::<u8>().ok()).unwrap_or(6);
    let unit = v.get("_SYSTEMD_UNIT").and_then(|u| u.as_str()).map(|s| s.to_string());
    let identifier = v.get("SYSLOG_IDENTIFIER").and_then(|u| u.as_str()).map(|s| s.to_string());
    let pid = v.get("_PID").and_then(|p| p.as_str()).and_then(|p| p.parse::<i64>().ok());
    Some(JournalRecord { realtime_usec, unit, identifier, pid, priority, message })
}

pub struct JournalSource {
    cursor_path: PathBuf,
    reader: Box<dyn JournalReader>,
}

impl JournalSource {
    pub fn new(cursor_path: impl Into<PathBuf>, reader: Box<dyn JournalReader>) -> Self {
        Self { cursor_path: cursor_path.into(), reader }
    }
}

impl LogSource for JournalSource {
    fn source(&self) -> LogSourceDto {
        LogSourceDto::Journal
    }

    fn poll(&mut self) -> AgentRuntimeResult<Vec<LogEntryDto>> {
        let cursor: Option<i64> = load_cursor(&self.cursor_path).and_then(|s| s.parse().ok());

        let records = self
            .reader
            .entries_since(cursor)
            .map_err(|e| AgentRuntimeError::LogSource { source: "journal".to_string(), reason: e.to_string() })?;

        let mut max_realtime = cursor.unwrap_or(0);
        let entries = records
            .into_iter()
            .map(|r| {
                max_realtime = max_realtime.max(r.realtime_usec);
                LogEntryDto {
                    source: LogSourceDto::Journal,
                    timestamp_utc_sec: r.realtime_usec / 1_000_000,
                    severity: r.priority,
                    message: r.message,
                    unit: r.unit,
                    identifier: r.identifier,
                    pid: r.pid,
                }
            })
            .collect();

        save_cursor(&self.cursor_path, &max_realtime.to_string())?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn first_poll_backfills_and_persists_an_end_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("syslog");
        let cursor_path = dir.path().join("cursor");
        fs::write(&log_path, "line one\nline two\n").unwrap();

        let mut source = SyslogFileSource::new(&log_path, &cursor_path);
        let entries = source.poll().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(cursor_path.exists());
    }

    #[test]
    fn second_poll_only_returns_appended_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("syslog");
        let cursor_path = dir.path().join("cursor");
        fs::write(&log_path, "line one\n").unwrap();

        let mut source = SyslogFileSource::new(&log_path, &cursor_path);
        source.poll().unwrap();

        let mut file = fs::OpenOptions::new().append(true).open(&log_path).unwrap();
        writeln!(file, "line two").unwrap();

        let entries = source.poll().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "line two");
    }

    #[test]
    fn truncation_resets_the_offset_and_rereads_from_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("syslog");
        let cursor_path = dir.path().join("cursor");
        fs::write(&log_path, "line one\nline two\nline three\n").unwrap();

        let mut source = SyslogFileSource::new(&log_path, &cursor_path);
        source.poll().unwrap();

        fs::write(&log_path, "fresh\n").unwrap();
        let entries = source.poll().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "fresh");
    }

    struct FakeKernelReader {
        boot_time: i64,
        records: Vec<(u64, i64, u8, String)>,
    }

    impl KernelLogReader for FakeKernelReader {
        fn read_all(&mut self) -> std::io::Result<Vec<(u64, i64, u8, String)>> {
            Ok(self.records.clone())
        }
        fn boot_time_utc(&self) -> std::io::Result<i64> {
            Ok(self.boot_time)
        }
    }

    #[test]
    fn kernel_source_only_reships_sequences_past_the_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let cursor_path = dir.path().join("log-cursors.kernel");
        let reader = FakeKernelReader {
            boot_time: 1_700_000_000,
            records: vec![(1, 5_000_000, 3, "disk error".to_string()), (2, 10_000_000, 6, "ok".to_string())],
        };
        let mut source = KernelRingBufferSource::new(&cursor_path, Box::new(reader));
        let first = source.poll().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].timestamp_utc_sec, 1_700_000_005);

        let reader2 = FakeKernelReader {
            boot_time: 1_700_000_000,
            records: vec![(1, 5_000_000, 3, "disk error".to_string()), (2, 10_000_000, 6, "ok".to_string()), (3, 15_000_000, 4, "warn".to_string())],
        };
        source.reader = Box::new(reader2);
        let second = source.poll().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].message, "warn");
    }

    #[test]
    fn kmsg_line_parses_priority_into_severity() {
        let parsed = parse_kmsg_line("30,154,82261,-;eth0: link becomes ready").unwrap();
        assert_eq!(parsed.0, 154);
        assert_eq!(parsed.2, 6);
        assert_eq!(parsed.3, "eth0: link becomes ready");
    }
}
