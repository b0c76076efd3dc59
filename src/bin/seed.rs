//! Seed script for development — populates the Redis store with a demo
//! account and sample analyses.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `REDIS_URL` (reads .env). The in-memory backend is not
//! seedable; it would vanish when this process exits.

use nexus_scan::models::analysis::{AnalysisAction, ApplyActionRequest, UploadRequest};
use nexus_scan::models::user::{SignupRequest, User};
use nexus_scan::services::{analysis, auth};
use nexus_scan::store::KvStore;

const DEMO_EMAIL: &str = "analyst@nexusscan.local";
const DEMO_PASSWORD: &str = "Test123!Demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let kv = KvStore::redis(&redis_url).await?;

    println!("=== NexusScan Seed Script ===");

    let user = seed_demo_user(&kv).await?;
    seed_sample_analyses(&kv, &user).await?;

    println!("\n=== Seed complete! ===");
    println!("Demo login: {DEMO_EMAIL} / {DEMO_PASSWORD}");

    Ok(())
}

async fn seed_demo_user(kv: &KvStore) -> anyhow::Result<User> {
    if let Some(id) = kv.get(&User::email_key(DEMO_EMAIL)).await? {
        let mut user: User = kv
            .get(&User::key(id))
            .await?
            .expect("email index points at missing user");
        // Reset the password for the existing demo account.
        user.password_hash = auth::hash_password(DEMO_PASSWORD)?;
        kv.set(&User::key(user.id), &user).await?;
        println!("[done] Reset demo account password");
        return Ok(user);
    }

    let user = auth::signup(
        kv,
        &SignupRequest {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            full_name: "Demo Analyst".to_string(),
            organization: "NexusScan Labs".to_string(),
            role: "Security Analyst".to_string(),
        },
    )
    .await?;
    println!("[done] Created demo account");
    Ok(user)
}

async fn seed_sample_analyses(kv: &KvStore, user: &User) -> anyhow::Result<()> {
    let samples = [
        ("ransomware.exe", 2456, "application/x-msdownload"),
        ("trojan_loader.dll", 1834, "application/x-msdownload"),
        ("suspicious_script.ps1", 890, "text/plain"),
        ("quarterly_report.pdf", 48210, "application/pdf"),
    ];

    let mut created = Vec::new();
    for (name, size, mime) in samples {
        let analysis = analysis::create(
            kv,
            user.id,
            &UploadRequest {
                file_name: name.to_string(),
                file_size: size,
                file_hash: format!("{:x}", md5ish(name)),
                file_type: mime.to_string(),
            },
        )
        .await?;
        println!(
            "[done] Seeded analysis {name} (score {})",
            analysis.threat_score
        );
        created.push(analysis);
    }

    // Quarantine the first sample so the dashboard has something to show.
    if let Some(first) = created.first() {
        analysis::apply_action(
            kv,
            user.id,
            first.id,
            &ApplyActionRequest {
                action: AnalysisAction::Quarantined,
                notes: Some("Seeded demo action".to_string()),
            },
        )
        .await?;
        println!("[done] Quarantined {}", first.file_name);
    }

    Ok(())
}

/// Cheap deterministic stand-in for a file hash; demo data only.
fn md5ish(name: &str) -> u64 {
    name.bytes().fold(0xcbf29ce484222325u64, |acc, b| {
        (acc ^ b as u64).wrapping_mul(0x100000001b3)
    })
}
