//! Scan command implementation.

use anyhow::bail;
use clap::Args;
use tokio::io::{AsyncBufRead, Lines};

use super::{print_notice, prompt_yes_no, stdin_lines};
use crate::app::Ledger;
use crate::scan::{CameraAccess, ScanEvent, ScanOutcome, ScanSession};

/// Arguments for the scan command
#[derive(Args)]
pub struct ScanArgs {
    /// Codes to record; read one per line from stdin when omitted
    pub codes: Vec<String>,

    /// Symbology reported with each code
    #[arg(long, default_value = "manual")]
    pub kind: String,

    /// Save without asking for confirmation
    #[arg(long, short)]
    pub yes: bool,
}

/// Run the scan command
pub async fn run(args: ScanArgs, ledger: &Ledger) -> anyhow::Result<()> {
    let (mut session, notice) = ledger.scan_session().await;
    if let Some(notice) = notice {
        print_notice(&notice);
    }
    if session.camera_access() != CameraAccess::Granted {
        bail!("Scanner is not available: camera permission was not granted");
    }

    let mut stdin = stdin_lines();
    let codes = if args.codes.is_empty() {
        if !args.yes {
            bail!("Pass --yes when reading codes from stdin");
        }
        read_codes(&mut stdin).await?
    } else {
        args.codes
    };

    record_codes(&mut session, codes, &args.kind, args.yes, &mut stdin).await?;
    Ok(())
}

/// Feed `codes` through the session, asking on `answers` before each save
/// unless `auto_accept` is set
async fn record_codes<R>(
    session: &mut ScanSession,
    codes: Vec<String>,
    kind: &str,
    auto_accept: bool,
    answers: &mut Lines<R>,
) -> anyhow::Result<Vec<ScanOutcome>>
where
    R: AsyncBufRead + Unpin,
{
    let mut outcomes = Vec::with_capacity(codes.len());

    for code in codes {
        session.on_scanned(ScanEvent::new(kind, code.clone()));

        let accept =
            auto_accept || prompt_yes_no(answers, &format!("Scanned code: {code}. Save it?")).await?;
        let outcome = session.confirm(accept).await;
        match outcome.notice() {
            Some(notice) => print_notice(&notice),
            None if matches!(outcome, ScanOutcome::Cancelled) => println!("Not saved: {code}"),
            None => {}
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

async fn read_codes<R>(lines: &mut Lines<R>) -> anyhow::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut codes = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let code = line.trim();
        if !code.is_empty() {
            codes.push(code.to_string());
        }
    }

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockPlatform;
    use crate::storage::MemoryKvStore;
    use crate::store::EntryStore;
    use crate::time::SystemClock;
    use std::sync::Arc;
    use tokio::io::{AsyncBufReadExt, BufReader};

    async fn granted_session() -> (ScanSession, Arc<EntryStore>) {
        let store = Arc::new(EntryStore::new(Arc::new(MemoryKvStore::new())));
        let mut session = ScanSession::new(store.clone(), Arc::new(SystemClock));
        session.request_camera(&MockPlatform::new()).await;
        (session, store)
    }

    #[tokio::test]
    async fn test_each_code_gets_its_own_answer() {
        let (mut session, store) = granted_session().await;
        let input: &[u8] = b"y\nn\ny\n";
        let mut answers = BufReader::new(input).lines();
        let codes = vec!["A1".to_string(), "B2".to_string(), "C3".to_string()];

        let outcomes = record_codes(&mut session, codes, "manual", false, &mut answers)
            .await
            .unwrap();

        assert!(matches!(outcomes[0], ScanOutcome::Saved(_)));
        assert!(matches!(outcomes[1], ScanOutcome::Cancelled));
        assert!(matches!(outcomes[2], ScanOutcome::Saved(_)));

        let saved: Vec<String> = store.load().await.iter().map(|e| e.code.clone()).collect();
        assert_eq!(saved, vec!["A1", "C3"]);
    }

    #[tokio::test]
    async fn test_auto_accept_skips_prompts() {
        let (mut session, store) = granted_session().await;
        let input: &[u8] = b"";
        let mut answers = BufReader::new(input).lines();
        let codes = vec!["A1".to_string(), "A1".to_string()];

        let outcomes = record_codes(&mut session, codes, "manual", true, &mut answers)
            .await
            .unwrap();

        assert!(matches!(outcomes[1], ScanOutcome::Duplicate(_)));
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_codes_skips_blank_lines() {
        let input: &[u8] = b"A1\n\n  B2  \n";
        let mut lines = BufReader::new(input).lines();

        assert_eq!(read_codes(&mut lines).await.unwrap(), vec!["A1", "B2"]);
    }
}
