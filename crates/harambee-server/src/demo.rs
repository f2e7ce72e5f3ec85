use chrono::{DateTime, TimeZone, Utc};

use harambee_store::Store;
use harambee_types::models::{
    ContributionFrequency, InvestmentStatus, NewGroup, NewInvestment, NewMeeting, NewMembership,
    NewNotification, NewTransaction, NewUser, NotificationKind, PaymentMethod, Role,
    TransactionKind, TransactionStatus,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn date_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

/// Seeds the demo fixtures: one user with three groups, their memberships,
/// a few transactions, upcoming meetings, investments, and notifications.
/// Log in with `johndoe` / `password123`.
pub fn seed(store: &dyn Store) -> anyhow::Result<()> {
    let password_hash = harambee_api::auth::hash_password("password123")?;
    let user = store.create_user(NewUser {
        username: "johndoe".into(),
        password_hash,
        email: "johndoe@example.com".into(),
        first_name: "John".into(),
        last_name: "Doe".into(),
        phone_number: "+254712345678".into(),
        profile_picture: None,
        preferred_language: "en".into(),
    })?;

    let umoja = store.create_group(NewGroup {
        name: "Umoja Investment Group".into(),
        description: "A group focused on real estate investments in Kenya".into(),
        founded_date: date(2025, 1, 15),
        total_value: 1_200_000,
        regular_contribution_amount: 5000,
        contribution_frequency: ContributionFrequency::Monthly,
        owner_id: user.id,
    })?;

    let maendeleo = store.create_group(NewGroup {
        name: "Maendeleo Savings Club".into(),
        description: "A savings club focusing on member loans and financial support".into(),
        founded_date: date(2025, 3, 10),
        total_value: 520_000,
        regular_contribution_amount: 8000,
        contribution_frequency: ContributionFrequency::Monthly,
        owner_id: user.id,
    })?;

    let pamoja = store.create_group(NewGroup {
        name: "Pamoja Real Estate Group".into(),
        description: "Group focusing on property investments in Kenya".into(),
        founded_date: date(2025, 1, 5),
        total_value: 1_500_000,
        regular_contribution_amount: 10_000,
        contribution_frequency: ContributionFrequency::Monthly,
        owner_id: user.id,
    })?;

    for (group_id, joined, total) in [
        (umoja.id, date(2025, 1, 15), 85_000),
        (maendeleo.id, date(2025, 3, 10), 60_000),
        (pamoja.id, date(2025, 1, 5), 100_000),
    ] {
        store.create_membership(NewMembership {
            user_id: user.id,
            group_id,
            role: Role::Admin,
            joined_date: joined,
            total_contributed: total,
            is_active: true,
        })?;
    }

    // Plain creates: the membership totals above already include these.
    store.create_transaction(NewTransaction {
        group_id: umoja.id,
        user_id: user.id,
        amount: 5000,
        kind: TransactionKind::Contribution,
        status: TransactionStatus::Completed,
        date: Utc::now(),
        payment_method: PaymentMethod::Mpesa,
        description: Some("Monthly contribution".into()),
        reference_number: Some("MPESA123456".into()),
    })?;

    store.create_transaction(NewTransaction {
        group_id: pamoja.id,
        user_id: user.id,
        amount: 10_000,
        kind: TransactionKind::Contribution,
        status: TransactionStatus::Completed,
        date: date(2025, 3, 2),
        payment_method: PaymentMethod::Mpesa,
        description: Some("Monthly contribution".into()),
        reference_number: Some("MPESA123457".into()),
    })?;

    store.create_transaction(NewTransaction {
        group_id: maendeleo.id,
        user_id: user.id,
        amount: 15_000,
        kind: TransactionKind::Loan,
        status: TransactionStatus::Completed,
        date: date(2025, 3, 5),
        payment_method: PaymentMethod::Bank,
        description: Some("Loan disbursement".into()),
        reference_number: Some("BANK123458".into()),
    })?;

    store.create_meeting(NewMeeting {
        group_id: maendeleo.id,
        title: "August Monthly Meeting".into(),
        date: date_time(2025, 4, 18, 18, 0),
        location: Some("Zoom".into()),
        is_virtual: true,
        meeting_link: Some("https://zoom.us/j/123456789".into()),
        description: Some("Monthly financial review and planning".into()),
        created_by: user.id,
    })?;

    store.create_meeting(NewMeeting {
        group_id: umoja.id,
        title: "Investment Review Meeting".into(),
        date: date_time(2025, 4, 22, 19, 30),
        location: Some("Google Meet".into()),
        is_virtual: true,
        meeting_link: Some("https://meet.google.com/abc-defg-hij".into()),
        description: Some("Review of current investments and future opportunities".into()),
        created_by: user.id,
    })?;

    store.create_meeting(NewMeeting {
        group_id: pamoja.id,
        title: "Property Acquisition Discussion".into(),
        date: date_time(2025, 4, 25, 17, 0),
        location: Some("Zoom".into()),
        is_virtual: true,
        meeting_link: Some("https://zoom.us/j/987654321".into()),
        description: Some("Discussion on potential property acquisitions".into()),
        created_by: user.id,
    })?;

    store.create_investment(NewInvestment {
        group_id: pamoja.id,
        name: "Commercial Property - Westlands".into(),
        kind: "real estate".into(),
        amount: 800_000,
        description: Some("Commercial property investment in Westlands area".into()),
        start_date: date(2025, 1, 15),
        expected_return_rate: Some("12%".into()),
        status: InvestmentStatus::Active,
        current_value: 864_800,
    })?;

    store.create_investment(NewInvestment {
        group_id: umoja.id,
        name: "Treasury Bonds".into(),
        kind: "bonds".into(),
        amount: 300_000,
        description: Some("Government treasury bonds".into()),
        start_date: date(2025, 2, 10),
        expected_return_rate: Some("10.5%".into()),
        status: InvestmentStatus::Active,
        current_value: 310_500,
    })?;

    store.create_investment(NewInvestment {
        group_id: umoja.id,
        name: "Equity Investment - Safaricom".into(),
        kind: "stocks".into(),
        amount: 150_000,
        description: Some("Investments in Safaricom shares".into()),
        start_date: date(2025, 3, 20),
        expected_return_rate: Some("8%".into()),
        status: InvestmentStatus::Active,
        current_value: 146_850,
    })?;

    store.create_notification(NewNotification {
        user_id: user.id,
        title: "Payment Reminder".into(),
        message: "Your contribution of KES 8,000 to Maendeleo Savings Club is due today.".into(),
        kind: NotificationKind::Payment,
        link_url: Some(format!("/groups/{}", maendeleo.id)),
    })?;

    store.create_notification(NewNotification {
        user_id: user.id,
        title: "Upcoming Meeting".into(),
        message: "You have a meeting for Maendeleo Savings Club on Aug 18, 2025 at 6:00 PM.".into(),
        kind: NotificationKind::Meeting,
        link_url: Some("/meetings".into()),
    })?;

    Ok(())
}
