mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestApp, PASSWORD};

async fn create_agent(app: &TestApp, admin: &str, email: &str, extra: Value) -> Result<Value> {
    let mut body = json!({
        "firstName": "Agent",
        "lastName": "Smith",
        "email": email,
        "password": PASSWORD,
    });
    if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), extra) {
        target.extend(fields);
    }
    let (status, body) = app.post("/api/agents", admin, body).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create agent failed: {} {}", status, body);
    Ok(body["data"]["agent"].clone())
}

async fn search(app: &TestApp, query: &str) -> Result<Value> {
    let res = app.client.get(app.url(&format!("/api/agents?{}", query))).send().await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "search failed: {}", res.status());
    Ok(res.json::<Value>().await?["data"].clone())
}

fn emails(page: &Value) -> Vec<String> {
    page["agents"]
        .as_array()
        .map(|agents| {
            agents
                .iter()
                .filter_map(|a| a["email"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn admin_created_agents_are_active_and_verified() -> Result<()> {
    let app = common::spawn_app().await?;
    let admin = app.admin_token().await?;

    let agent = create_agent(
        &app,
        &admin,
        "agent@example.com",
        json!({ "licenseStates": ["TX"], "yearsOfExperience": 8, "status": "pending" }),
    )
    .await?;
    assert_eq!(agent["role"], "agent");
    assert_eq!(agent["agentProfile"]["status"], "active");
    assert_eq!(agent["agentProfile"]["verified"], true);
    assert_eq!(agent["agentProfile"]["expertise"], "Residential");

    let (status, body) = app
        .post(
            "/api/agents",
            &admin,
            json!({
                "firstName": "Bad",
                "lastName": "States",
                "email": "bad@example.com",
                "password": PASSWORD,
                "licenseStates": ["ZZ"]
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["agentProfile.licenseStates"].is_string());
    Ok(())
}

#[tokio::test]
async fn agent_management_requires_admin() -> Result<()> {
    let app = common::spawn_app().await?;
    let (user_token, _) = app.register("plain@example.com").await?;

    let res = app
        .client
        .post(app.url("/api/agents"))
        .json(&json!({ "firstName": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = app.post("/api/agents", &user_token, json!({ "firstName": "X" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = app.get("/api/admin/users", &user_token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn directory_filters_and_projects_agents() -> Result<()> {
    let app = common::spawn_app().await?;
    let admin = app.admin_token().await?;

    create_agent(
        &app,
        &admin,
        "dallas@example.com",
        json!({
            "yearsOfExperience": 8,
            "languages": ["English", "Spanish"],
            "specialties": ["Luxury Homes"],
            "licenseStates": ["TX"],
            "office": { "name": "RE/MAX Premier", "address": { "city": "Dallas", "state": "TX", "zipCode": "75201" } }
        }),
    )
    .await?;
    create_agent(
        &app,
        &admin,
        "miami@example.com",
        json!({
            "yearsOfExperience": 3,
            "languages": ["Portuguese"],
            "expertise": "Commercial",
            "licenseStates": ["FL"],
            "office": { "name": "RE/MAX Sunshine", "address": { "city": "Miami", "state": "FL" } }
        }),
    )
    .await?;
    let hidden = create_agent(&app, &admin, "inactive@example.com", json!({ "yearsOfExperience": 6 })).await?;
    let hidden_id = hidden["id"].as_str().unwrap_or_default().to_string();
    app.put(&format!("/api/agents/{}", hidden_id), &admin, json!({ "status": "inactive" })).await?;
    app.register("not-an-agent@example.com").await?;

    let all = search(&app, "").await?;
    assert_eq!(all["total"], 2);
    assert_eq!(all["currentPage"], 1);
    assert_eq!(all["totalPages"], 1);
    let first = &all["agents"][0];
    assert!(first.get("role").is_none());
    assert!(first.get("notifications").is_none());
    assert!(first["agentProfile"].is_object());

    assert_eq!(emails(&search(&app, "city=dall").await?), vec!["dallas@example.com"]);
    assert_eq!(emails(&search(&app, "state=fl&city=mia").await?), vec!["miami@example.com"]);
    assert_eq!(emails(&search(&app, "name=sunshine").await?), vec!["miami@example.com"]);
    assert_eq!(emails(&search(&app, "language=span").await?), vec!["dallas@example.com"]);
    assert_eq!(emails(&search(&app, "specialty=Luxury%20Homes").await?), vec!["dallas@example.com"]);
    assert_eq!(emails(&search(&app, "licenseState=FL").await?), vec!["miami@example.com"]);
    assert_eq!(emails(&search(&app, "expertise=Commercial").await?), vec!["miami@example.com"]);
    assert_eq!(emails(&search(&app, "experience=5-10").await?), vec!["dallas@example.com"]);
    assert_eq!(search(&app, "experience=abc").await?["total"], 2);
    assert_eq!(search(&app, "city=%20%20").await?["total"], 2);
    assert_eq!(search(&app, "city=.*").await?["total"], 0);

    let (status, body) = app.get(&format!("/api/agents/{}", hidden_id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agent"]["agentProfile"]["status"], "inactive");
    Ok(())
}

#[tokio::test]
async fn directory_paginates() -> Result<()> {
    let app = common::spawn_app().await?;
    let admin = app.admin_token().await?;
    for i in 0..12 {
        create_agent(&app, &admin, &format!("page{:02}@example.com", i), json!({})).await?;
    }

    let page = search(&app, "page=2&limit=5").await?;
    assert_eq!(page["total"], 12);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["currentPage"], 2);
    assert_eq!(emails(&page).len(), 5);

    let last = search(&app, "page=3&limit=5").await?;
    assert_eq!(emails(&last).len(), 2);

    let fallback = search(&app, "page=zero&limit=-3").await?;
    assert_eq!(fallback["currentPage"], 1);
    assert_eq!(emails(&fallback).len(), 10);
    Ok(())
}

#[tokio::test]
async fn update_merges_profile_and_delete_removes() -> Result<()> {
    let app = common::spawn_app().await?;
    let admin = app.admin_token().await?;
    let agent = create_agent(
        &app,
        &admin,
        "merge@example.com",
        json!({ "licenseStates": ["TX"], "bio": "Dallas specialist", "yearsOfExperience": 8 }),
    )
    .await?;
    let path = format!("/api/agents/{}", agent["id"].as_str().unwrap_or_default());

    let (status, body) = app.put(&path, &admin, json!({ "yearsOfExperience": 9, "lastName": "Jones" })).await?;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"]["agent"];
    assert_eq!(updated["lastName"], "Jones");
    assert_eq!(updated["agentProfile"]["yearsOfExperience"], 9);
    assert_eq!(updated["agentProfile"]["bio"], "Dallas specialist");
    assert_eq!(updated["agentProfile"]["licenseStates"], json!(["TX"]));

    let (status, _) = app.put(&path, &admin, json!({ "rating": { "average": 5.5 } })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.delete(&path, &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Agent deleted successfully");

    let (status, body) = app.delete(&path, &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Agent not found");

    let res = app.client.get(app.url(&path)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_agent_ids_are_not_agents() -> Result<()> {
    let app = common::spawn_app().await?;
    let admin = app.admin_token().await?;
    let (_, user) = app.register("user@example.com").await?;
    let path = format!("/api/agents/{}", user["id"].as_str().unwrap_or_default());

    let res = app.client.get(app.url(&path)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&path, &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn upload_stores_image_and_serves_it() -> Result<()> {
    let app = common::spawn_app().await?;
    let admin = app.admin_token().await?;
    let agent = create_agent(&app, &admin, "photo@example.com", json!({})).await?;
    let upload_path = format!("/api/agents/{}/upload", agent["id"].as_str().unwrap_or_default());

    let image = reqwest::multipart::Part::bytes(b"fake-png-bytes".to_vec())
        .file_name("me.png")
        .mime_str("image/png")?;
    let res = app
        .client
        .post(app.url(&upload_path))
        .bearer_auth(&admin)
        .multipart(reqwest::multipart::Form::new().part("profileImage", image))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let public_path = body["data"]["agent"]["agentProfile"]["profileImage"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(public_path.starts_with("/uploads/agents/agent-"));
    assert!(public_path.ends_with(".png"));

    let served = app.client.get(app.url(&public_path)).send().await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.as_ref(), b"fake-png-bytes");

    let text = reqwest::multipart::Part::bytes(b"hello".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")?;
    let res = app
        .client
        .post(app.url(&upload_path))
        .bearer_auth(&admin)
        .multipart(reqwest::multipart::Form::new().part("profileImage", text))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .client
        .post(app.url(&upload_path))
        .bearer_auth(&admin)
        .multipart(reqwest::multipart::Form::new().text("note", "no file"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Please upload a file");
    Ok(())
}
