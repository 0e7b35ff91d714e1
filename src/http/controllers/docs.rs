use actix_web::{web, HttpResponse};
use serde_json::{json, Map, Value};

use crate::App;

fn user_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "username": { "type": "string" },
            "email": { "type": "string", "nullable": true },
            "full_name": { "type": "string", "nullable": true },
            "disabled": { "type": "boolean" },
            "admin_channels": { "type": "array", "items": { "type": "string" } },
            "admin_roles": { "type": "array", "items": { "type": "string" } }
        }
    })
}

/// Builds the OpenAPI document for the routes mounted under `prefix`.
#[must_use]
pub fn describe(project_name: &str, prefix: &str) -> Value {
    let user = json!({ "$ref": "#/components/schemas/User" });
    let users = json!({ "type": "array", "items": user });
    let ok = |schema: &Value| json!({ "200": { "content": { "application/json": { "schema": schema } } } });
    let paging = json!([
        { "name": "skip", "in": "query", "schema": { "type": "integer", "default": 0 } },
        { "name": "limit", "in": "query", "schema": { "type": "integer", "default": 100 } }
    ]);
    let mut search = json!([{ "name": "q", "in": "query", "required": true, "schema": { "type": "string" } }]);
    if let (Some(search), Some(paging)) = (search.as_array_mut(), paging.as_array()) {
        search.extend(paging.iter().cloned());
    }
    let username = json!([{ "name": "username", "in": "path", "required": true, "schema": { "type": "string" } }]);

    let access_token = json!({
        "type": "object",
        "properties": {
            "access_token": { "type": "string" },
            "token_type": { "type": "string" }
        }
    });

    let mut paths = Map::new();
    paths.insert(
        "/login/access-token".into(),
        json!({ "post": operation("login", "Get an access token", false, ok(&access_token)) }),
    );
    paths.insert(
        "/login/test-token".into(),
        json!({ "post": operation("login", "Test an access token", true, ok(&user)) }),
    );
    paths.insert(
        "/users/".into(),
        json!({
            "get": with_parameters(operation("users", "List users", true, ok(&users)), &paging),
            "post": operation("users", "Create a user", true, ok(&user))
        }),
    );
    paths.insert(
        "/users/search/".into(),
        json!({ "get": with_parameters(operation("users", "Search users", true, ok(&users)), &search) }),
    );
    paths.insert(
        "/users/open".into(),
        json!({ "post": operation("users", "Create a user without being logged in", false, ok(&user)) }),
    );
    paths.insert(
        "/users/me".into(),
        json!({
            "get": operation("users", "Get the current user", true, ok(&user)),
            "put": operation("users", "Update the current user", true, ok(&user))
        }),
    );
    paths.insert(
        "/users/{username}".into(),
        json!({
            "get": with_parameters(operation("users", "Get a user by username", true, ok(&user)), &username),
            "put": with_parameters(operation("users", "Update a user", true, ok(&user)), &username)
        }),
    );

    json!({
        "openapi": "3.0.3",
        "info": { "title": project_name, "version": env!("CARGO_PKG_VERSION") },
        "servers": [{ "url": prefix }],
        "components": {
            "schemas": { "User": user_schema() },
            "securitySchemes": {
                "bearer": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            }
        },
        "paths": paths
    })
}

fn operation(tag: &str, summary: &str, secured: bool, responses: Value) -> Value {
    let mut operation = json!({ "tags": [tag], "summary": summary, "responses": responses });
    if secured {
        operation["security"] = json!([{ "bearer": [] }]);
    }
    operation
}

fn with_parameters(mut operation: Value, parameters: &Value) -> Value {
    operation["parameters"] = parameters.clone();
    operation
}

#[tracing::instrument(skip_all)]
pub async fn openapi(app: web::Data<App>) -> HttpResponse {
    HttpResponse::Ok().json(describe(&app.config.project_name, &app.config.api_prefix))
}
