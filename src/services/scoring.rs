//! Fabricated threat scoring and vulnerability synthesis.
//!
//! There is no real analysis behind these numbers: the threat score is a
//! uniform draw in [0,99] and findings are sampled from a fixed OWASP
//! Top 10 list. Functions take `&mut impl Rng` so tests can seed.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::analysis::{Severity, Vulnerability};

/// One of the ten canned OWASP vulnerability classes.
#[derive(Debug, Clone, Copy)]
pub struct OwaspCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Canned finding metadata, OWASP Top 10 (2021).
pub const OWASP_TOP_10: [OwaspCategory; 10] = [
    OwaspCategory {
        id: "A01",
        name: "Broken Access Control",
        description: "Unauthorized access to resources",
    },
    OwaspCategory {
        id: "A02",
        name: "Cryptographic Failures",
        description: "Weak encryption detected",
    },
    OwaspCategory {
        id: "A03",
        name: "Injection",
        description: "SQL/Command injection patterns found",
    },
    OwaspCategory {
        id: "A04",
        name: "Insecure Design",
        description: "Poor security architecture",
    },
    OwaspCategory {
        id: "A05",
        name: "Security Misconfiguration",
        description: "Default configurations detected",
    },
    OwaspCategory {
        id: "A06",
        name: "Vulnerable Components",
        description: "Outdated libraries used",
    },
    OwaspCategory {
        id: "A07",
        name: "Authentication Failures",
        description: "Weak authentication mechanisms",
    },
    OwaspCategory {
        id: "A08",
        name: "Software and Data Integrity",
        description: "Unsigned code execution",
    },
    OwaspCategory {
        id: "A09",
        name: "Logging Failures",
        description: "Insufficient logging detected",
    },
    OwaspCategory {
        id: "A10",
        name: "Server-Side Request Forgery",
        description: "SSRF patterns identified",
    },
];

/// Threat score that counts as a detected threat for user counters and
/// dashboard stats.
pub const THREAT_SCORE_THRESHOLD: u8 = 70;

/// Draw a threat score uniformly in [0,99].
pub fn random_threat_score(rng: &mut impl Rng) -> u8 {
    rng.random_range(0..100)
}

/// Number of findings for a score: floor(score/20), capped at the
/// category list length.
pub fn vulnerability_count(score: u8) -> usize {
    (score as usize / 20).min(OWASP_TOP_10.len())
}

/// Sample `vulnerability_count(score)` findings from the OWASP list,
/// with severity derived from the overall score. Categories may repeat.
pub fn synthesize_vulnerabilities(
    rng: &mut impl Rng,
    analysis_id: Uuid,
    score: u8,
    detected_at: DateTime<Utc>,
) -> Vec<Vulnerability> {
    let severity = Severity::from_score(score);
    (0..vulnerability_count(score))
        .map(|_| {
            let category = OWASP_TOP_10[rng.random_range(0..OWASP_TOP_10.len())];
            Vulnerability {
                id: Uuid::new_v4(),
                analysis_id,
                owasp_id: category.id.to_string(),
                owasp_name: category.name.to_string(),
                severity,
                description: category.description.to_string(),
                detected_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn score_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let score = random_threat_score(&mut rng);
            assert!(score <= 99);
        }
    }

    #[test]
    fn vulnerability_count_steps() {
        assert_eq!(vulnerability_count(0), 0);
        assert_eq!(vulnerability_count(19), 0);
        assert_eq!(vulnerability_count(20), 1);
        assert_eq!(vulnerability_count(39), 1);
        assert_eq!(vulnerability_count(40), 2);
        assert_eq!(vulnerability_count(60), 3);
        assert_eq!(vulnerability_count(80), 4);
        assert_eq!(vulnerability_count(99), 4);
    }

    #[test]
    fn synthesized_findings_match_count_and_severity() {
        let mut rng = StdRng::seed_from_u64(7);
        let analysis_id = Uuid::new_v4();
        let now = Utc::now();

        let vulns = synthesize_vulnerabilities(&mut rng, analysis_id, 85, now);
        assert_eq!(vulns.len(), 4);
        for v in &vulns {
            assert_eq!(v.analysis_id, analysis_id);
            assert_eq!(v.severity, Severity::Critical);
            assert!(OWASP_TOP_10.iter().any(|c| c.id == v.owasp_id));
        }
    }

    #[test]
    fn low_score_has_no_findings() {
        let mut rng = StdRng::seed_from_u64(7);
        let vulns = synthesize_vulnerabilities(&mut rng, Uuid::new_v4(), 15, Utc::now());
        assert!(vulns.is_empty());
    }

    #[test]
    fn category_ids_are_a01_through_a10() {
        let ids: Vec<&str> = OWASP_TOP_10.iter().map(|c| c.id).collect();
        assert_eq!(ids.first(), Some(&"A01"));
        assert_eq!(ids.last(), Some(&"A10"));
        assert_eq!(ids.len(), 10);
    }
}
