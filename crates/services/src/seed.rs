//! Demo data for local runs: three accounts, four complaints, two replies.
//!
//! Everything goes through the regular services so the seeded state obeys the
//! same rules as live traffic.

use domains::{ComplaintStatus, DomainError, Result};

use crate::{AccountService, ComplaintService, ReplyService};

const ADMIN: (&str, &str) = ("Admin Smith", "admin@university.edu");
const JOHN: (&str, &str) = ("John Doe", "john.student@university.edu");
const JANE: (&str, &str) = ("Jane Student", "jane@university.edu");

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub accounts: usize,
    pub complaints: usize,
    pub replies: usize,
}

/// Loads the demo fixture set. Every account gets `password`.
///
/// Returns an empty report when the admin account already exists, so running
/// it against a persistent store twice is harmless.
pub async fn seed_demo_data(
    accounts: &AccountService,
    complaints: &ComplaintService,
    replies: &ReplyService,
    password: &str,
) -> Result<SeedReport> {
    let admin = match accounts.register_admin(ADMIN.0, ADMIN.1, password).await {
        Ok(admin) => admin,
        Err(DomainError::Validation { field: "email", .. }) => {
            tracing::info!("demo data already present, skipping seed");
            return Ok(SeedReport::default());
        }
        Err(err) => return Err(err),
    };
    let john = accounts.signup(JOHN.0, JOHN.1, password).await?;
    let jane = accounts.signup(JANE.0, JANE.1, password).await?;

    let wifi = complaints
        .create(
            &john,
            "Library WiFi Connection Issues",
            "The WiFi in the library keeps disconnecting every 10 minutes. This is making it \
             impossible to complete my online assignments and attend virtual classes.",
        )
        .await?;
    complaints
        .create(
            &jane,
            "Cafeteria Food Quality",
            "The food quality in the cafeteria has significantly decreased over the past month. \
             Multiple students have complained about undercooked meals.",
        )
        .await?;
    let lab = complaints
        .create(
            &john,
            "Lab Equipment Not Working",
            "Several microscopes in Biology Lab 204 are not functioning properly. This is \
             affecting our practical coursework.",
        )
        .await?;
    complaints
        .create(
            &jane,
            "Parking Space Shortage",
            "There are not enough parking spaces for students. I often have to arrive 30 minutes \
             early just to find a spot.",
        )
        .await?;

    complaints
        .set_status(&admin, wifi.id, ComplaintStatus::InProgress)
        .await?;
    replies
        .add(
            &admin,
            wifi.id,
            "Thank you for reporting this issue. We have contacted the IT department and they are \
             investigating the WiFi connectivity problems. A technician will be on-site tomorrow.",
        )
        .await?;

    replies
        .add(
            &admin,
            lab.id,
            "The microscopes have been repaired and are now fully functional. Thank you for \
             bringing this to our attention.",
        )
        .await?;
    complaints
        .set_status(&admin, lab.id, ComplaintStatus::Resolved)
        .await?;

    let report = SeedReport {
        accounts: 3,
        complaints: 4,
        replies: 2,
    };
    tracing::info!(?report, "demo data seeded");
    Ok(report)
}
