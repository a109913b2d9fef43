use serde_json::{json, Value};
use vinha_core::catalog::subreports;
use vinha_core::model::ReportKind;

/// Static description of the routes, served at `/apispec.json`.
pub fn document() -> Value {
    let bearer = json!([{ "bearerAuth": [] }]);
    let year = json!({
        "name": "year", "in": "path", "required": true,
        "schema": { "type": "integer" }, "description": "Year of the data (e.g. 2023)"
    });
    let category = |kind: ReportKind| {
        let names: Vec<&str> = subreports(kind).iter().map(|s| s.category).collect();
        json!({
            "name": "category", "in": "path", "required": true,
            "schema": { "type": "string", "enum": names }
        })
    };
    let report = |tag: &str, summary: &str, params: Vec<Value>| {
        json!({
            "get": {
                "tags": [tag],
                "summary": summary,
                "security": bearer,
                "parameters": params,
                "responses": {
                    "200": { "description": "Report data" },
                    "400": { "description": "Invalid category" },
                    "401": { "description": "Unauthorized" },
                    "404": { "description": "Table not found" },
                    "500": { "description": "Upstream or parse failure" }
                }
            }
        })
    };

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Brazil Wine Data API",
            "description": "API providing wine production and economics data in Brazil.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "components": {
            "securitySchemes": { "bearerAuth": { "type": "http", "scheme": "bearer" } }
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Welcome message",
                    "responses": { "200": { "description": "OK" } }
                }
            },
            "/login": {
                "post": {
                    "tags": ["Auth"],
                    "summary": "Exchange credentials for an access token",
                    "requestBody": { "content": { "application/json": { "schema": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string" }
                        },
                        "required": ["username", "password"]
                    } } } },
                    "responses": {
                        "200": { "description": "Successful login" },
                        "401": { "description": "Invalid credentials" }
                    }
                }
            },
            "/production/{year}": report(
                "Production", "Wine production by product", vec![year.clone()]
            ),
            "/processing/{year}/{category}": report(
                "Processing", "Grape processing by cultivar",
                vec![year.clone(), category(ReportKind::Processing)]
            ),
            "/commercialization/{year}": report(
                "Commercialization", "Wine commercialization by product", vec![year.clone()]
            ),
            "/import/{year}/{category}": report(
                "Trade", "Imports by country", vec![year.clone(), category(ReportKind::Import)]
            ),
            "/export/{year}/{category}": report(
                "Trade", "Exports by country", vec![year, category(ReportKind::Export)]
            )
        }
    })
}
