//! Tool-level tests for the TasCraft MCP server
mod common;

use chrono::Local;
use common::{MockBackend, extract_id_from_response, get_test_server, server_with};
use tascraft::{Config, TasCraftServer};
use tempfile::TempDir;

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

async fn add(server: &TasCraftServer, title: &str, due: &str, priority: u32) -> String {
    let response = server
        .add_task(
            title.to_string(),
            due.to_string(),
            None,
            None,
            None,
            Some(priority),
            None,
        )
        .await
        .unwrap();
    extract_id_from_response(&response)
}

#[tokio::test]
async fn test_level_up_and_boss_defeat() {
    let (server, _temp_file) = get_test_server();
    server.sign_up("steve".to_string()).await.unwrap();

    let first = add(&server, "Lab report", &today(), 5).await;
    let second = add(&server, "Exam prep", &today(), 5).await;

    let status = server.status().await.unwrap();
    assert!(status.contains("Weekly boss: 2 / 2 HP remaining"));

    let result = server.toggle_task(first).await.unwrap();
    assert!(result.contains("+500 XP"));
    assert!(!result.contains("LEVEL UP"));
    assert!(!result.contains("boss defeated"));

    let result = server.toggle_task(second.clone()).await.unwrap();
    assert!(result.contains("LEVEL UP! Level 1 -> 2"));
    assert!(result.contains("Weekly boss defeated! All 2 quest(s) due this week are complete."));

    // reopening never levels down and the boss comes back without a signal
    let result = server.toggle_task(second.clone()).await.unwrap();
    assert_eq!(result, "Quest reopened: Exam prep (-500 XP)");

    // defeating it again fires again
    let result = server.toggle_task(second).await.unwrap();
    assert!(result.contains("Weekly boss defeated!"));
}

#[tokio::test]
async fn test_subjects_and_board() {
    let (server, _temp_file) = get_test_server();
    server.sign_up("steve".to_string()).await.unwrap();

    let response = server
        .add_subject("Math".to_string(), Some("sword".to_string()), None)
        .await
        .unwrap();
    assert!(response.contains("sword, #ff5555"));
    let math = extract_id_from_response(&response);

    let response = server
        .add_task(
            "Algebra".to_string(),
            "2030-01-10".to_string(),
            Some("08:00".to_string()),
            None,
            None,
            None,
            Some(math.clone()),
        )
        .await
        .unwrap();
    assert!(response.contains("Quest added: Algebra"));
    add(&server, "beta", "2030-01-09", 1).await;

    let listing = server
        .list_tasks(None, None, Some(math.clone()))
        .await
        .unwrap();
    assert!(listing.starts_with("Math (1 quest(s)):"));
    assert!(listing.contains("Algebra"));
    assert!(listing.contains("due 2030-01-10 08:00"));

    let listing = server
        .list_tasks(None, None, Some("missing".to_string()))
        .await
        .unwrap();
    assert_eq!(listing, "Unknown Quest\n\nNo quests found");

    let listing = server
        .list_tasks(None, Some("title-asc".to_string()), None)
        .await
        .unwrap();
    assert!(listing.starts_with("All Quests (2 quest(s)):"));
    assert!(listing.find("Algebra").unwrap() < listing.find("beta").unwrap());

    let listing = server.list_tasks(None, None, None).await.unwrap();
    assert!(listing.find("beta").unwrap() < listing.find("Algebra").unwrap());

    let unknown_subject = server
        .add_task(
            "Orphan".to_string(),
            "2030-01-10".to_string(),
            None,
            None,
            None,
            None,
            Some("missing".to_string()),
        )
        .await;
    assert!(unknown_subject.is_err());

    let shelf = server.list_subjects().await.unwrap();
    assert!(shelf.contains("Math (sword, #ff5555, 1 quest(s))"));

    let deleted = server.delete_subject(math).await.unwrap();
    assert_eq!(deleted, "Subject deleted: Math (1 quest(s) moved to All Quests)");
    assert_eq!(server.list_subjects().await.unwrap(), "No subjects yet");
}

#[tokio::test]
async fn test_update_and_delete_task() {
    let (server, _temp_file) = get_test_server();
    server.sign_up("steve".to_string()).await.unwrap();
    let id = add(&server, "Essay", "2030-01-10", 1).await;

    let nothing = server
        .update_task(id.clone(), None, None, None, None, None, None, None)
        .await;
    assert!(nothing.is_err());

    let time_only = server
        .update_task(
            id.clone(),
            None,
            None,
            None,
            Some("10:00".to_string()),
            None,
            None,
            None,
        )
        .await;
    assert!(time_only.is_err());

    let updated = server
        .update_task(
            id.clone(),
            Some("Long essay".to_string()),
            Some("Five pages".to_string()),
            None,
            None,
            Some("project".to_string()),
            Some(4),
            None,
        )
        .await
        .unwrap();
    assert!(updated.contains("Quest updated: Long essay"));

    let listing = server
        .list_tasks(Some("pending".to_string()), None, None)
        .await
        .unwrap();
    assert!(listing.contains("Long essay (id: "));
    assert!(listing.contains("Project, priority 4"));
    assert!(listing.contains("Notes: Five pages"));

    let deleted = server.delete_task(id.clone()).await.unwrap();
    assert!(deleted.starts_with("Quest deleted: Long essay"));
    assert!(server.delete_task(id).await.is_err());
}

#[tokio::test]
async fn test_local_leaderboard() {
    let (server, _temp_file) = get_test_server();
    server.sign_up("steve".to_string()).await.unwrap();
    let id = add(&server, "Essay", "2030-01-10", 3).await;
    server.toggle_task(id).await.unwrap();
    server.sign_out().await.unwrap();

    server.sign_up("alex".to_string()).await.unwrap();
    let board = server.leaderboard().await.unwrap();
    assert!(board.contains("#1 Notch - 99900 XP (Level 100), 999 quest(s) completed\n"));
    assert!(board.contains("#3 Alex - 1000 XP (Level 2), 10 quest(s) completed [idle]\n"));
    assert!(board.contains("#4 steve - 300 XP (Level 1), 1 quest(s) completed\n"));
    assert!(board.contains("#5 alex - 0 XP (Level 1), 0 quest(s) completed [idle] (you)"));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let (server, temp_file) = get_test_server();
    server.sign_up("steve".to_string()).await.unwrap();
    add(&server, "Essay", "2030-01-10", 2).await;
    drop(server);

    let server = TasCraftServer::new(Config::local(temp_file.path())).unwrap();
    let status = server.status().await.unwrap();
    assert!(status.starts_with("Player: steve (offline)"));
    assert!(status.contains("Quests: 1 total, 0 completed, 1 pending"));
}

#[tokio::test]
async fn test_sign_in_errors_are_readable() {
    let (server, _temp_file) = get_test_server();
    let result = server.sign_in("herobrine".to_string()).await;
    assert!(result.is_err());
    assert!(server.sign_up("me@mail.com".to_string()).await.is_err());
    assert_eq!(server.sign_out().await.unwrap(), "Nobody is signed in");
}

#[tokio::test]
async fn test_completion_shouts_through_backend() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new();
    let server = server_with(&dir, &backend);
    server.sign_up("steve".to_string()).await.unwrap();
    let id = add(&server, "Essay", "2030-01-10", 1).await;
    assert_eq!(id, "remote-1");

    let result = server.toggle_task(id).await.unwrap();
    assert!(result.contains("Shouted to all players: steve just gained XP!"));
    assert_eq!(
        backend.state.lock().unwrap().shouts,
        vec!["steve just gained XP!".to_string()]
    );

    let status = server.status().await.unwrap();
    assert!(status.starts_with("Player: steve (online)"));
}
