use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use squirrel_core::{open_db, SqliteSquirrelRepository, Squirrel, SquirrelRepository};
use squirrel_server::{serve, AppState};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
    db_path: PathBuf,
    client: Client,
    _dir: TempDir,
}

impl TestApp {
    async fn start() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("squirrel_db.db");
        let conn = open_db(&db_path)?;

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(err) = serve(listener, AppState::new(conn)).await {
                eprintln!("server error: {err}");
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            db_path,
            client: Client::new(),
            _dir: dir,
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
    ) -> anyhow::Result<reqwest::Response> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(fields) = form {
            request = request.form(fields);
        }
        Ok(request.send().await?)
    }

    async fn create(&self, name: &str, size: &str) -> anyhow::Result<reqwest::Response> {
        self.send(
            Method::POST,
            "/squirrels",
            Some(&[("name", name), ("size", size)]),
        )
        .await
    }

    async fn get_json(&self, path: &str) -> anyhow::Result<Value> {
        let res = self.send(Method::GET, path, None).await?;
        assert_eq!(res.status(), StatusCode::OK);
        Ok(res.json::<Value>().await?)
    }

    /// Reads the table through a separate connection, bypassing HTTP.
    fn db_records(&self) -> anyhow::Result<Vec<Squirrel>> {
        let conn = open_db(&self.db_path)?;
        Ok(SqliteSquirrelRepository::new(&conn).list_squirrels()?)
    }
}

fn content_type(res: &reqwest::Response) -> String {
    res.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn assert_not_found(res: reqwest::Response) -> anyhow::Result<()> {
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&res), "text/plain");
    assert_eq!(res.text().await?, "404 Not Found");
    Ok(())
}

#[tokio::test]
async fn list_on_empty_table_returns_empty_json_array() -> anyhow::Result<()> {
    let app = TestApp::start().await?;

    let res = app.send(Method::GET, "/squirrels", None).await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "application/json");
    assert_eq!(res.json::<Value>().await?, serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn list_returns_squirrels_in_creation_order() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    for name in ["First", "Second", "Third"] {
        app.create(name, "small").await?;
    }

    let body = app.get_json("/squirrels").await?;

    let names: Vec<&str> = body
        .as_array()
        .expect("list body is an array")
        .iter()
        .map(|item| item["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
    Ok(())
}

#[tokio::test]
async fn list_matches_database_and_is_idempotent() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Fluffy", "large").await?;
    app.create("Nutty", "tiny").await?;

    let first = app.get_json("/squirrels").await?;
    let second = app.get_json("/squirrels").await?;

    assert_eq!(first, second);
    assert_eq!(first, serde_json::to_value(app.db_records()?)?);
    Ok(())
}

#[tokio::test]
async fn get_returns_single_record_as_json() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("FirstOne", "tiny").await?;
    app.create("SecondOne", "huge").await?;
    let records = app.db_records()?;

    let res = app
        .send(Method::GET, &format!("/squirrels/{}", records[1].id), None)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "application/json");
    let body = res.json::<Value>().await?;
    assert_eq!(body["id"], records[1].id.get());
    assert_eq!(body["name"], "SecondOne");
    assert_eq!(body["size"], "huge");
    assert_eq!(body.as_object().map(|fields| fields.len()), Some(3));
    Ok(())
}

#[tokio::test]
async fn create_returns_201_with_location_and_persists() -> anyhow::Result<()> {
    let app = TestApp::start().await?;

    let res = app.create("Special-Name_123!", "extra-large").await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let created = res.json::<Value>().await?;
    assert_eq!(location, format!("/squirrels/{}", created["id"]));

    let records = app.db_records()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Special-Name_123!");
    assert_eq!(records[0].size, "extra-large");
    assert_eq!(created["id"], records[0].id.get());

    let fetched = app.get_json(&location).await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn create_with_missing_field_stores_empty_text() -> anyhow::Result<()> {
    let app = TestApp::start().await?;

    let res = app
        .send(Method::POST, "/squirrels", Some(&[("name", "NoSize")]))
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let records = app.db_records()?;
    assert_eq!(records[0].name, "NoSize");
    assert_eq!(records[0].size, "");
    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("First", "small").await?;
    app.create("Second", "medium").await?;
    app.create("Third", "large").await?;
    let records = app.db_records()?;
    let target = records[1].id;

    let res = app
        .send(
            Method::PUT,
            &format!("/squirrels/{target}"),
            Some(&[("name", "SecondUpdated"), ("size", "updated")]),
        )
        .await?;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await?.is_empty());

    let updated = app.db_records()?;
    assert_eq!(updated[0].name, "First");
    assert_eq!(updated[1].id, target);
    assert_eq!(updated[1].name, "SecondUpdated");
    assert_eq!(updated[1].size, "updated");
    assert_eq!(updated[2].name, "Third");

    let fetched = app.get_json(&format!("/squirrels/{target}")).await?;
    assert_eq!(fetched["name"], "SecondUpdated");
    let listed = app.get_json("/squirrels").await?;
    assert_eq!(listed[1]["name"], "SecondUpdated");
    Ok(())
}

#[tokio::test]
async fn delete_removes_only_target() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Keep1", "small").await?;
    app.create("DeleteThis", "medium").await?;
    app.create("Keep2", "large").await?;
    let target = app.db_records()?[1].id;

    let res = app
        .send(Method::DELETE, &format!("/squirrels/{target}"), None)
        .await?;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let names: Vec<String> = app
        .db_records()?
        .into_iter()
        .map(|squirrel| squirrel.name)
        .collect();
    assert_eq!(names, vec!["Keep1", "Keep2"]);
    Ok(())
}

#[tokio::test]
async fn deleted_squirrel_is_gone_for_every_verb() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Temporary", "small").await?;
    let path = format!("/squirrels/{}", app.db_records()?[0].id);

    let res = app.send(Method::DELETE, &path, None).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert_not_found(app.send(Method::GET, &path, None).await?).await?;
    assert_not_found(
        app.send(Method::PUT, &path, Some(&[("name", "Update"), ("size", "new")]))
            .await?,
    )
    .await?;
    assert_not_found(app.send(Method::DELETE, &path, None).await?).await?;
    assert!(app.get_json("/squirrels").await?.as_array().is_some_and(Vec::is_empty));
    Ok(())
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    let first = app.create("Gone", "small").await?.json::<Value>().await?;
    app.send(Method::DELETE, &format!("/squirrels/{}", first["id"]), None)
        .await?;

    let second = app.create("Next", "small").await?.json::<Value>().await?;

    assert!(second["id"].as_i64() > first["id"].as_i64());
    Ok(())
}

#[tokio::test]
async fn missing_records_return_404() -> anyhow::Result<()> {
    let app = TestApp::start().await?;

    assert_not_found(app.send(Method::GET, "/squirrels/999999", None).await?).await?;
    assert_not_found(
        app.send(
            Method::PUT,
            "/squirrels/888888",
            Some(&[("name", "NoExist"), ("size", "none")]),
        )
        .await?,
    )
    .await?;
    assert_not_found(app.send(Method::DELETE, "/squirrels/777777", None).await?).await?;
    Ok(())
}

#[tokio::test]
async fn malformed_ids_return_404_even_when_records_exist() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Existing", "small").await?;

    for path in ["/squirrels/0", "/squirrels/-1", "/squirrels/abc", "/squirrels/1.0"] {
        assert_not_found(app.send(Method::GET, path, None).await?).await?;
    }
    Ok(())
}

#[tokio::test]
async fn unknown_routes_and_method_mismatches_return_404() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Existing", "small").await?;
    let form: &[(&str, &str)] = &[("name", "Invalid"), ("size", "none")];
    let junk: &[(&str, &str)] = &[("data", "test")];

    let cases: Vec<(Method, &str, Option<&[(&str, &str)]>)> = vec![
        (Method::POST, "/squirrels/1", Some(form)),
        (Method::PUT, "/squirrels", Some(form)),
        (Method::DELETE, "/squirrels", None),
        (Method::GET, "/invalid_resource", None),
        (Method::POST, "/invalid_resource", Some(junk)),
        (Method::PUT, "/invalid_resource/1", Some(junk)),
        (Method::DELETE, "/invalid_resource/1", None),
        (Method::GET, "/squirrels/1/extra", None),
        (Method::GET, "/", None),
        (Method::PATCH, "/squirrels/1", Some(form)),
    ];

    for (method, path, body) in cases {
        let res = app.send(method.clone(), path, body).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{method} {path}");
        assert_not_found(res).await?;
    }

    assert_eq!(app.db_records()?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn undecodable_id_segment_returns_404_for_every_verb() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Existing", "small").await?;

    assert_not_found(app.send(Method::GET, "/squirrels/%FF", None).await?).await?;
    assert_not_found(
        app.send(
            Method::PUT,
            "/squirrels/%FF",
            Some(&[("name", "Bad"), ("size", "none")]),
        )
        .await?,
    )
    .await?;
    assert_not_found(app.send(Method::DELETE, "/squirrels/%FF", None).await?).await?;
    assert_eq!(app.db_records()?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn leading_zero_id_resolves_to_same_record() -> anyhow::Result<()> {
    let app = TestApp::start().await?;
    app.create("Padded", "small").await?;
    let id = app.db_records()?[0].id;

    let padded = app.get_json(&format!("/squirrels/0{id}")).await?;

    assert_eq!(padded["id"], id.get());
    assert_eq!(padded["name"], "Padded");
    Ok(())
}

#[tokio::test]
async fn bodies_without_form_content_are_read_as_empty_form() -> anyhow::Result<()> {
    let app = TestApp::start().await?;

    let res = app.send(Method::POST, "/squirrels", None).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .client
        .post(format!("{}/squirrels", app.base_url))
        .json(&serde_json::json!({"name": "Json", "size": "ignored"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let records = app.db_records()?;
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|squirrel| squirrel.name.is_empty() && squirrel.size.is_empty()));

    app.send(
        Method::PUT,
        &format!("/squirrels/{}", records[0].id),
        Some(&[("name", "Named"), ("size", "sized")]),
    )
    .await?;
    let res = app
        .send(Method::PUT, &format!("/squirrels/{}", records[0].id), None)
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = app.db_records()?;
    assert_eq!(cleared[0].name, "");
    assert_eq!(cleared[0].size, "");
    Ok(())
}
