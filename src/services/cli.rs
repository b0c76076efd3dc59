//! Scripted CLI terminal responder.
//!
//! Literal prefix matching over a fixed command set with hardcoded output
//! blocks. This is string matching, not a shell: there is no parsing,
//! no process execution, and no state beyond the stored history.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cli::CliCommand;
use crate::store::KvStore;

/// Sentinel output telling the client to reset its terminal history.
pub const CLEAR_TERMINAL: &str = "CLEAR_TERMINAL";

/// Responder result: canned output, or the client-side clear signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Clear,
}

/// Map a command line to its canned response.
pub fn respond(command: &str) -> Reply {
    let cmd = command.trim().to_lowercase();

    if cmd.starts_with("netstat") {
        Reply::Output(
            "Active Connections\n\n  Proto  Local Address          Foreign Address        State\n  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING\n  TCP    0.0.0.0:445            0.0.0.0:0              LISTENING\n  TCP    192.168.1.100:49152    20.190.151.7:443       ESTABLISHED\n  TCP    192.168.1.100:49153    142.250.185.14:443     ESTABLISHED\n  UDP    0.0.0.0:5353           *:*\n  UDP    192.168.1.100:137      *:*"
                .to_string(),
        )
    } else if cmd.starts_with("tasklist") {
        Reply::Output(
            "Image Name                     PID Session Name        Mem Usage\n========================= ======== ================ ============\nSystem                           4 Services                 1,024 K\nsvchost.exe                    856 Services                12,456 K\nexplorer.exe                  4532 Console                 45,892 K\nchrome.exe                    7234 Console                234,567 K\nmalware_scanner.exe           9823 Console                 89,234 K"
                .to_string(),
        )
    } else if cmd.starts_with("ipconfig") {
        Reply::Output(
            "Windows IP Configuration\n\nEthernet adapter Ethernet:\n\n   Connection-specific DNS Suffix  . : local\n   IPv4 Address. . . . . . . . . . . : 192.168.1.100\n   Subnet Mask . . . . . . . . . . . : 255.255.255.0\n   Default Gateway . . . . . . . . . : 192.168.1.1"
                .to_string(),
        )
    } else if cmd.starts_with("whoami") {
        Reply::Output("nexus\\security_analyst".to_string())
    } else if cmd.starts_with("systeminfo") {
        Reply::Output(
            "Host Name:                 NEXUS-WORKSTATION\nOS Name:                   Microsoft Windows 11 Enterprise\nOS Version:                10.0.22631 N/A Build 22631\nSystem Type:               x64-based PC\nProcessor(s):              1 Processor(s) Installed.\n                           [01]: Intel64 Family 6 Model 165 Stepping 2 GenuineIntel ~2904 Mhz"
                .to_string(),
        )
    } else if cmd.starts_with("nslookup") {
        let domain = cmd.split_whitespace().nth(1).unwrap_or("example.com");
        Reply::Output(format!(
            "Server:  UnKnown\nAddress:  192.168.1.1\n\nNon-authoritative answer:\nName:    {domain}\nAddresses:  93.184.216.34\n          2606:2800:220:1:248:1893:25c8:1946"
        ))
    } else if cmd.starts_with("dir") || cmd.starts_with("ls") {
        Reply::Output(
            " Volume in drive C has no label.\n Directory of C:\\Users\\security_analyst\n\n06/10/2025  02:30 PM    <DIR>          .\n06/10/2025  02:30 PM    <DIR>          ..\n06/09/2025  11:45 AM             2,456 ransomware.exe\n06/08/2025  03:22 PM             1,834 trojan_loader.dll\n06/07/2025  09:15 AM               890 suspicious_script.ps1\n               3 File(s)          5,180 bytes"
                .to_string(),
        )
    } else if cmd == "help" {
        Reply::Output(
            "Available Commands:\n  netstat [-an]     - Display active network connections\n  tasklist          - Display running processes\n  ipconfig [/all]   - Display network configuration\n  whoami            - Display current user\n  systeminfo        - Display system information\n  nslookup [domain] - Query DNS records\n  dir / ls          - List directory contents\n  clear             - Clear terminal\n  help              - Display this help message"
                .to_string(),
        )
    } else if cmd == "clear" {
        Reply::Clear
    } else {
        Reply::Output(format!(
            "'{command}' is not recognized as an internal or external command,\noperable program or batch file.\n\nType 'help' for available commands."
        ))
    }
}

/// Execute a command for the user: resolve the canned output and persist
/// a history entry. `clear` returns the sentinel and is never stored.
pub async fn execute(
    kv: &KvStore,
    user_id: Uuid,
    command: &str,
) -> Result<(String, DateTime<Utc>), AppError> {
    let timestamp = Utc::now();

    let output = match respond(command) {
        Reply::Clear => return Ok((CLEAR_TERMINAL.to_string(), timestamp)),
        Reply::Output(output) => output,
    };

    let entry = CliCommand {
        id: Uuid::now_v7(),
        user_id,
        command: command.to_string(),
        output: output.clone(),
        timestamp,
    };
    kv.set(&CliCommand::key(entry.id), &entry).await?;

    Ok((output, timestamp))
}

/// The caller's stored command history, via prefix scan.
pub async fn history(kv: &KvStore, user_id: Uuid) -> Result<Vec<CliCommand>, AppError> {
    let commands: Vec<CliCommand> = kv.get_by_prefix("cli_commands:").await?;
    Ok(commands
        .into_iter()
        .filter(|c| c.user_id == user_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_prefixes_get_canned_output() {
        for cmd in [
            "netstat -an",
            "tasklist",
            "ipconfig /all",
            "whoami",
            "systeminfo",
            "dir",
            "ls -la",
        ] {
            match respond(cmd) {
                Reply::Output(output) => assert!(!output.is_empty(), "{cmd}"),
                Reply::Clear => panic!("{cmd} should not clear"),
            }
        }
    }

    #[test]
    fn nslookup_echoes_domain() {
        let Reply::Output(output) = respond("nslookup evil.example.org") else {
            panic!("expected output");
        };
        assert!(output.contains("Name:    evil.example.org"));

        let Reply::Output(output) = respond("nslookup") else {
            panic!("expected output");
        };
        assert!(output.contains("example.com"));
    }

    #[test]
    fn help_and_clear_are_exact_matches() {
        assert!(matches!(respond("help"), Reply::Output(_)));
        assert_eq!(respond("clear"), Reply::Clear);
        assert_eq!(respond("  CLEAR  "), Reply::Clear);

        // A longer word with the same prefix is not recognized.
        let Reply::Output(output) = respond("clearall") else {
            panic!("expected output");
        };
        assert!(output.contains("not recognized"));
    }

    #[test]
    fn unknown_command_is_not_recognized() {
        let Reply::Output(output) = respond("format c:") else {
            panic!("expected output");
        };
        assert!(output.contains("'format c:' is not recognized"));
        assert!(output.contains("Type 'help'"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(matches!(respond("WHOAMI"), Reply::Output(_)));
        let Reply::Output(upper) = respond("NETSTAT") else {
            panic!("expected output");
        };
        let Reply::Output(lower) = respond("netstat") else {
            panic!("expected output");
        };
        assert_eq!(upper, lower);
    }

    #[tokio::test]
    async fn execute_stores_history_except_clear() {
        let kv = KvStore::memory();
        let user_id = Uuid::new_v4();

        let (output, _) = execute(&kv, user_id, "whoami").await.unwrap();
        assert_eq!(output, "nexus\\security_analyst");

        let (output, _) = execute(&kv, user_id, "clear").await.unwrap();
        assert_eq!(output, CLEAR_TERMINAL);

        let entries = history(&kv, user_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "whoami");
    }

    #[tokio::test]
    async fn history_is_scoped_to_user() {
        let kv = KvStore::memory();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        execute(&kv, alice, "whoami").await.unwrap();
        execute(&kv, alice, "tasklist").await.unwrap();
        execute(&kv, bob, "ipconfig").await.unwrap();

        let entries = history(&kv, alice).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.user_id == alice));
    }
}
