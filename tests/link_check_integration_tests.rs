use async_trait::async_trait;
use link_check::collectors::LinkProbe;
use link_check::collectors::device::{DeviceSession, DeviceTarget, RawDeviceOutput};
use link_check::errors::{DeviceError, ExtractError, ProbeError, StageError};
use link_check::models::{PingStats, ReportRow, TransferMeasurement};
use link_check::storage::CsvReport;
use link_check::{DeviceFamily, LinkCheck, RunStage};
use std::path::Path;
use std::sync::Mutex;

/// End-to-end runs of the link check against scripted collaborators
/// Reports are written to real files in a temporary directory

const STATUS_TREE: &str = r#"{
    "data": {
        "ethernet-wan": {
            "status": {"connection_state": "disconnected"},
            "diagnostics": {},
            "config": {"hostname": "wired"}
        },
        "mdm-4G": {
            "status": {"connection_state": "connected"},
            "diagnostics": {
                "CUR_APN": "VZWINTERNET",
                "HOMECARRID": "Verizon",
                "SERDISP": "LTE",
                "SS": -75,
                "RSRP": "-102",
                "RSRQ": "-11",
                "SINR": "6.4",
                "MDN": "5551234567",
                "IMEI": "359225051234567",
                "IMSI": "311480123456789",
                "FW_VERSION": "SWI9X15C_05.05.58.00"
            },
            "config": {"hostname": "router-01"}
        }
    }
}"#;

const DISCONNECTED_TREE: &str = r#"{
    "mdm-4G": {
        "status": {"connection_state": "disconnected"},
        "diagnostics": {},
        "config": {"hostname": "router-01"}
    }
}"#;

const LEGACY_BANNER: &str = "system_id: cp350-lab\n\
Active APN: \"VZWINTERNET\"\n\
HOMECARRID: Verizon\n\
SERDISP: LTE\n\
SS: -81\n\
RSRP: -105\n\
MDN: 5551234567\n";

const ZYXEL_BANNER: &str =
    "P-660R-D1> status: Up, upstream rate: 1024 kbps, downstream rate: 8192 kbps, firmware version: V3.40(AGL.3)\n";

struct ScriptedProbe {
    fail_upload: bool,
}

impl ScriptedProbe {
    fn healthy() -> Self {
        Self { fail_upload: false }
    }
}

#[async_trait]
impl LinkProbe for ScriptedProbe {
    async fn ping(&self) -> Result<PingStats, ProbeError> {
        Ok(PingStats {
            min: "10.1".to_string(),
            avg: "12.3".to_string(),
            max: "15.7".to_string(),
            jitter: "1.2".to_string(),
        })
    }

    async fn upload(&self) -> Result<TransferMeasurement, ProbeError> {
        if self.fail_upload {
            return Err(ProbeError::FtpConnect {
                host: "192.0.2.10".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(TransferMeasurement {
            bytes: 1_048_576,
            elapsed_secs: 2.0,
        })
    }

    async fn download(&self) -> Result<TransferMeasurement, ProbeError> {
        Ok(TransferMeasurement {
            bytes: 1_048_576,
            elapsed_secs: 1.0,
        })
    }
}

/// Device session answering every command with the same payload
struct ScriptedSession {
    reply: Option<&'static str>,
    commands: Mutex<Vec<String>>,
}

impl ScriptedSession {
    fn replying(reply: &'static str) -> Self {
        Self {
            reply: Some(reply),
            commands: Mutex::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            reply: None,
            commands: Mutex::new(Vec::new()),
        }
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceSession for ScriptedSession {
    async fn run_command(
        &self,
        target: &DeviceTarget,
        command: &str,
    ) -> Result<RawDeviceOutput, DeviceError> {
        self.commands.lock().unwrap().push(command.to_string());
        match self.reply {
            Some(reply) => Ok(RawDeviceOutput::from(reply)),
            None => Err(DeviceError::Timeout {
                host: target.host.clone(),
                timeout_secs: 30,
            }),
        }
    }
}

fn target() -> DeviceTarget {
    DeviceTarget {
        host: "192.168.0.1".to_string(),
        port: 22,
        username: "admin".to_string(),
        password: "secret".to_string(),
    }
}

fn read_records(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Report should be readable");
    reader
        .records()
        .map(|record| {
            record
                .expect("Report rows should parse")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_run_without_device_leaves_device_blocks_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::unreachable();
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let summary = check.run(DeviceFamily::None, None).await.unwrap();

    assert_eq!(check.stage(), RunStage::Done);
    assert!(summary.stats.is_none());
    assert!(session.commands().is_empty(), "No device should be contacted");

    let records = read_records(&path);
    assert_eq!(records.len(), 2, "Header plus one row");
    assert_eq!(records[0], ReportRow::header());

    let row = &records[1];
    assert_eq!(&row[1..5], ["10.1", "12.3", "15.7", "1.2"]);
    assert_eq!(row[5], "4194304.00");
    assert_eq!(row[6], "8388608.00");
    assert_eq!(row[7], "");
    assert!(row[8..].iter().all(String::is_empty));
}

#[tokio::test]
async fn test_cradlepoint_750_run_records_connected_wan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::replying(STATUS_TREE);
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let summary = check
        .run(DeviceFamily::Cradlepoint750, Some(&target()))
        .await
        .unwrap();

    assert_eq!(session.commands(), vec!["get status/wan/devices"]);
    assert_eq!(summary.stats.as_ref().unwrap().hostname(), "router-01");
    assert!(summary.row.zyxel_block().iter().all(String::is_empty));

    let records = read_records(&path);
    let row = &records[1];
    assert_eq!(row[7], "router-01");
    assert_eq!(
        &row[8..19],
        [
            "VZWINTERNET",
            "Verizon",
            "LTE",
            "-75",
            "-102",
            "-11",
            "6.4",
            "5551234567",
            "359225051234567",
            "311480123456789",
            "SWI9X15C_05.05.58.00",
        ]
    );
}

#[tokio::test]
async fn test_cradlepoint_350_partial_banner_still_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::replying(LEGACY_BANNER);
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let summary = check
        .run(DeviceFamily::Cradlepoint350, Some(&target()))
        .await
        .unwrap();

    assert_eq!(session.commands(), vec!["get"]);
    let block = summary.row.cradlepoint_block();
    assert_eq!(block[0], "VZWINTERNET");
    assert_eq!(block[3], "-81");
    assert_eq!(block[4], "-105");
    // RSRQ and SINR are absent from the banner
    assert_eq!(block[5], "");
    assert_eq!(block[6], "");
    assert_eq!(summary.row.columns()[7], "cp350-lab");
    assert_eq!(read_records(&path).len(), 2);
}

#[tokio::test]
async fn test_zyxel_run_leaves_cradlepoint_block_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::replying(ZYXEL_BANNER);
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let summary = check.run(DeviceFamily::Zyxel, Some(&target())).await.unwrap();

    assert_eq!(session.commands(), vec!["show system status"]);
    assert!(summary.row.cradlepoint_block().iter().all(String::is_empty));
    assert_eq!(summary.row.zyxel_block(), ["Up", "1024", "8192", "V3.40(AGL.3)"]);
    assert_eq!(summary.row.columns()[7], "P-660R-D1");
}

#[tokio::test]
async fn test_no_connected_wan_aborts_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::replying(DISCONNECTED_TREE);
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let err = check
        .run(DeviceFamily::Cradlepoint750, Some(&target()))
        .await
        .unwrap_err();

    assert_eq!(err.stage, RunStage::Downloaded);
    assert!(matches!(
        err.source,
        StageError::Extract(ExtractError::NoConnectedWan { .. })
    ));
    assert!(err.to_string().contains("device stats retrieval"));
    assert!(!path.exists(), "A failed run must not create the report");
}

#[tokio::test]
async fn test_failed_upload_reports_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe { fail_upload: true };
    let session = ScriptedSession::unreachable();
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let err = check.run(DeviceFamily::None, None).await.unwrap_err();

    assert_eq!(err.stage, RunStage::Pinged);
    assert!(matches!(err.source, StageError::Probe(ProbeError::FtpConnect { .. })));
    assert!(err.to_string().contains("FTP upload"));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_unreachable_device_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::unreachable();
    let report = CsvReport::new(&path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let err = check.run(DeviceFamily::Zyxel, Some(&target())).await.unwrap_err();

    assert_eq!(err.stage, RunStage::Downloaded);
    assert!(matches!(err.source, StageError::Device(DeviceError::Timeout { .. })));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_missing_target_is_a_device_error() {
    let dir = tempfile::tempdir().unwrap();
    let probe = ScriptedProbe::healthy();
    let session = ScriptedSession::replying(ZYXEL_BANNER);
    let report = CsvReport::new(dir.path().join("report.csv"));

    let mut check = LinkCheck::new(&probe, &session, &report);
    let err = check.run(DeviceFamily::Zyxel, None).await.unwrap_err();

    assert!(matches!(err.source, StageError::Device(DeviceError::MissingTarget)));
    assert!(session.commands().is_empty());
}

#[tokio::test]
async fn test_repeated_runs_share_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let probe = ScriptedProbe::healthy();
    let report = CsvReport::new(&path);

    let sessions = [
        ScriptedSession::unreachable(),
        ScriptedSession::replying(STATUS_TREE),
        ScriptedSession::replying(ZYXEL_BANNER),
    ];
    let runs = [
        (DeviceFamily::None, None),
        (DeviceFamily::Cradlepoint750, Some(target())),
        (DeviceFamily::Zyxel, Some(target())),
    ];

    for (session, (family, device)) in sessions.iter().zip(runs.iter()) {
        let mut check = LinkCheck::new(&probe, session, &report);
        check.run(*family, device.as_ref()).await.unwrap();
    }

    let records = read_records(&path);
    assert_eq!(records.len(), 4, "One header and three rows");
    assert_eq!(records[0], ReportRow::header());
    let header_rows = records
        .iter()
        .filter(|record| record[0] == "Date-Time")
        .count();
    assert_eq!(header_rows, 1);
    for record in &records {
        assert_eq!(record.len(), ReportRow::column_count());
    }
}
