/// Integration tests: boot the full router on a loopback port with a fresh
/// in-memory store, then drive it over real HTTP with reqwest.
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use harambee_api::{AppState, AppStateInner};
use harambee_store::{MemStore, SharedStore};

async fn spawn_server() -> String {
    let store: SharedStore = Arc::new(MemStore::new());
    let state: AppState = Arc::new(AppStateInner {
        store,
        jwt_secret: "test-secret".into(),
    });
    let app = harambee_api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn register_user(client: &Client, base: &str, username: &str) -> (String, i64) {
    let res = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "username": username,
            "password": "password123",
            "email": format!("{username}@example.com"),
            "firstName": "Test",
            "lastName": "User",
            "phoneNumber": "+254700000000"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

async fn create_group(client: &Client, base: &str, token: &str, name: &str) -> i64 {
    let res = client
        .post(format!("{base}/api/groups"))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "description": "A test savings group",
            "foundedDate": "2025-01-15T00:00:00Z",
            "regularContributionAmount": 5000,
            "contributionFrequency": "monthly"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["group"]["id"].as_i64().unwrap()
}

async fn add_member(client: &Client, base: &str, token: &str, group_id: i64, user_id: i64, role: &str) {
    let res = client
        .post(format!("{base}/api/groups/{group_id}/members"))
        .bearer_auth(token)
        .json(&json!({ "userId": user_id, "role": role }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn register_login_me_roundtrip() {
    let base = spawn_server().await;
    let client = Client::new();

    let (token, user_id) = register_user(&client, &base, "johndoe").await;

    // The registration response never carries password material
    let res = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "username": "johndoe", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["user"]["username"], "johndoe");

    let res = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "username": "johndoe", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{base}/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["id"].as_i64().unwrap(), user_id);

    // Profile updates are a shallow merge
    let res = client
        .put(format!("{base}/api/users/me"))
        .bearer_auth(&token)
        .json(&json!({ "phoneNumber": "+254799999999" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["phoneNumber"], "+254799999999");
    assert_eq!(body["user"]["firstName"], "Test");
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let base = spawn_server().await;
    let client = Client::new();

    for path in ["/api/auth/me", "/api/groups", "/api/dashboard", "/api/notifications"] {
        let res = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "no token on {path}");
    }

    let res = client
        .get(format!("{base}/api/groups"))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{base}/api/groups"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let base = spawn_server().await;
    let client = Client::new();

    register_user(&client, &base, "amina").await;

    let res = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "username": "amina",
            "password": "password123",
            "email": "other@example.com",
            "firstName": "Amina",
            "lastName": "Otieno",
            "phoneNumber": "+254711111111"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Username already exists");

    let res = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "username": "amina2",
            "password": "password123",
            "email": "amina@example.com",
            "firstName": "Amina",
            "lastName": "Otieno",
            "phoneNumber": "+254711111111"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn registration_enumerates_field_errors() {
    let base = spawn_server().await;
    let client = Client::new();

    let res = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "username": "ab",
            "password": "short",
            "email": "not-an-email",
            "firstName": "",
            "lastName": "User",
            "phoneNumber": "+254700000000"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Validation error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"firstName"));
}

#[tokio::test]
async fn group_lifecycle_enforces_roles() {
    let base = spawn_server().await;
    let client = Client::new();

    let (alice, _alice_id) = register_user(&client, &base, "alice").await;
    let (bob, bob_id) = register_user(&client, &base, "bob").await;

    let group_id = create_group(&client, &base, &alice, "Umoja Investment Group").await;

    // Creator sees the group, outsiders do not
    let res = client.get(format!("{base}/api/groups")).bearer_auth(&alice).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["groups"].as_array().unwrap().len(), 1);

    let res = client.get(format!("{base}/api/groups")).bearer_auth(&bob).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["groups"].as_array().unwrap().is_empty());

    // Non-members cannot update the group or add members
    let res = client
        .put(format!("{base}/api/groups/{group_id}"))
        .bearer_auth(&bob)
        .json(&json!({ "name": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Not authorized to update this group");

    let res = client
        .post(format!("{base}/api/groups/{group_id}/members"))
        .bearer_auth(&bob)
        .json(&json!({ "userId": bob_id, "role": "member" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The admin can do both
    let res = client
        .put(format!("{base}/api/groups/{group_id}"))
        .bearer_auth(&alice)
        .json(&json!({ "name": "Umoja Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["group"]["name"], "Umoja Renamed");

    add_member(&client, &base, &alice, group_id, bob_id, "treasurer").await;

    // Joining twice conflicts
    let res = client
        .post(format!("{base}/api/groups/{group_id}/members"))
        .bearer_auth(&alice)
        .json(&json!({ "userId": bob_id, "role": "member" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // A treasurer may create investments but not meetings
    let res = client
        .post(format!("{base}/api/groups/{group_id}/investments"))
        .bearer_auth(&bob)
        .json(&json!({
            "name": "Treasury Bonds",
            "type": "bonds",
            "amount": 300000,
            "startDate": "2025-02-01T00:00:00Z",
            "currentValue": 310000
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{base}/api/groups/{group_id}/meetings"))
        .bearer_auth(&bob)
        .json(&json!({ "title": "Sneaky Meeting", "date": "2025-05-01T18:00:00Z" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Not authorized to create meetings");

    // The investment fan-out reached the admin and skipped the creator
    let res = client
        .get(format!("{base}/api/notifications"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "New Investment Created");
    assert_eq!(notifications[0]["type"], "system");

    let res = client
        .get(format!("{base}/api/notifications"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["notifications"].as_array().unwrap().is_empty());

    // Unknown group ids are 404s
    let res = client
        .get(format!("{base}/api/groups/9999"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contributions_accrue_on_the_membership() {
    let base = spawn_server().await;
    let client = Client::new();

    let (alice, _) = register_user(&client, &base, "alice").await;
    let (bob, bob_id) = register_user(&client, &base, "bob").await;
    let (carol, _) = register_user(&client, &base, "carol").await;

    let group_id = create_group(&client, &base, &alice, "Pamoja").await;
    add_member(&client, &base, &alice, group_id, bob_id, "member").await;

    let res = client
        .post(format!("{base}/api/transactions"))
        .bearer_auth(&bob)
        .json(&json!({
            "groupId": group_id,
            "amount": 5000,
            "type": "contribution",
            "status": "completed",
            "date": "2025-03-02T00:00:00Z",
            "paymentMethod": "mpesa"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Pending contributions do not accrue
    let res = client
        .post(format!("{base}/api/transactions"))
        .bearer_auth(&bob)
        .json(&json!({
            "groupId": group_id,
            "amount": 3000,
            "type": "contribution",
            "status": "pending",
            "date": "2025-03-09T00:00:00Z",
            "paymentMethod": "mpesa"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{base}/api/groups/{group_id}"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let members = body["members"].as_array().unwrap();
    let bob_member = members
        .iter()
        .find(|m| m["userId"].as_i64() == Some(bob_id))
        .unwrap();
    assert_eq!(bob_member["totalContributed"].as_i64(), Some(5000));

    // Any membership grants access to the group ledger; outsiders get 403
    let res = client
        .get(format!("{base}/api/groups/{group_id}/transactions"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

    let res = client
        .get(format!("{base}/api/groups/{group_id}/transactions"))
        .bearer_auth(&carol)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Zero amounts are rejected with a field error
    let res = client
        .post(format!("{base}/api/transactions"))
        .bearer_auth(&bob)
        .json(&json!({
            "groupId": group_id,
            "amount": 0,
            "type": "contribution",
            "status": "completed",
            "date": "2025-03-10T00:00:00Z",
            "paymentMethod": "cash"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"][0]["field"], "amount");
}

#[tokio::test]
async fn meeting_creation_notifies_other_members() {
    let base = spawn_server().await;
    let client = Client::new();

    let (alice, _) = register_user(&client, &base, "alice").await;
    let (bob, bob_id) = register_user(&client, &base, "bob").await;
    let (carol, carol_id) = register_user(&client, &base, "carol").await;

    let group_id = create_group(&client, &base, &alice, "Maendeleo").await;
    add_member(&client, &base, &alice, group_id, bob_id, "member").await;
    add_member(&client, &base, &alice, group_id, carol_id, "secretary").await;

    // Secretaries may schedule meetings
    let res = client
        .post(format!("{base}/api/groups/{group_id}/meetings"))
        .bearer_auth(&carol)
        .json(&json!({
            "title": "Monthly Review",
            "date": "2025-04-18T18:00:00Z",
            "isVirtual": true,
            "meetingLink": "https://zoom.us/j/123456"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    for token in [&alice, &bob] {
        let res = client
            .get(format!("{base}/api/notifications"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        let notifications = body["notifications"].as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["title"], "New Meeting Scheduled");
        assert_eq!(notifications[0]["isRead"], false);
        assert_eq!(notifications[0]["linkUrl"], "/meetings");
    }

    let res = client
        .get(format!("{base}/api/notifications"))
        .bearer_auth(&carol)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["notifications"].as_array().unwrap().is_empty());

    // Cross-group listing attaches the group name
    let res = client
        .get(format!("{base}/api/meetings"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let meetings = body["meetings"].as_array().unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0]["title"], "Monthly Review");
    assert_eq!(meetings[0]["groupName"], "Maendeleo");

    // Only the recipient may mark a notification read
    let res = client
        .get(format!("{base}/api/notifications"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let notification_id = body["notifications"][0]["id"].as_i64().unwrap();

    let res = client
        .put(format!("{base}/api/notifications/{notification_id}/read"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{base}/api/notifications/{notification_id}/read"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .put(format!("{base}/api/notifications/9999/read"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_aggregates_over_http() {
    let base = spawn_server().await;
    let client = Client::new();

    let (alice, _) = register_user(&client, &base, "alice").await;
    let group_id = create_group(&client, &base, &alice, "Umoja Investment Group").await;

    let res = client
        .post(format!("{base}/api/transactions"))
        .bearer_auth(&alice)
        .json(&json!({
            "groupId": group_id,
            "amount": 5000,
            "type": "contribution",
            "status": "completed",
            "date": (chrono::Utc::now() - chrono::Duration::days(7)).to_rfc3339(),
            "paymentMethod": "mpesa"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{base}/api/groups/{group_id}/meetings"))
        .bearer_auth(&alice)
        .json(&json!({
            "title": "Planning Session",
            "date": (chrono::Utc::now() + chrono::Duration::days(2)).to_rfc3339()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{base}/api/dashboard"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["stats"]["activeGroupsCount"], 1);
    assert_eq!(body["stats"]["totalContributions"], 5000);
    assert_eq!(body["stats"]["upcomingMeetingsCount"], 1);
    assert_eq!(body["stats"]["activeInvestmentsCount"], 0);
    assert_eq!(body["investmentSummary"]["total"], 0);
    assert_eq!(body["groups"][0]["name"], "Umoja Investment Group");
    assert_eq!(body["recentActivities"].as_array().unwrap().len(), 1);

    // The meeting two days out lands in this week's bucket
    let this_week = body["upcomingSchedule"]["thisWeek"].as_array().unwrap();
    assert!(this_week.iter().any(|e| e["type"] == "meeting" && e["title"] == "Planning Session"));
}
