//! Integration test: CLI handlers against an in-memory transport.

use std::sync::Mutex;

use chrono::{NaiveDate, TimeZone, Utc};
use formkit_cli::export::{run_export, ExportArgs};
use formkit_cli::records::{run_delete, run_list, DeleteArgs, ListArgs};
use formkit_cli::submit::{run_submit, SubmitArgs};
use formkit_client::{ClientError, FormTransport};
use formkit_core::{
    ApiErrorBody, FieldDescriptor, FieldErrors, FieldType, FieldValue, FieldValues, FormSchema,
    ListQuery, PaginatedResponse, Pagination, SortOrder, Submission, ValidationRule,
};
use serde_json::{json, Value};

/// Stores submissions in memory and rejects any `name` equal to "taken".
#[derive(Default)]
struct MemoryTransport {
    records: Mutex<Vec<Submission>>,
}

impl MemoryTransport {
    fn seeded(names: &[&str]) -> Self {
        let records = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut data = FieldValues::new();
                data.insert("name".into(), FieldValue::from(*name));
                Submission {
                    id: format!("rec-{i}"),
                    created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, i as u32).unwrap(),
                    data,
                }
            })
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    fn names(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.data["name"].display())
            .collect()
    }

    fn store(&self, id: String, values: &FieldValues) -> Result<Value, ClientError> {
        if values.get("name").map(FieldValue::display).as_deref() == Some("taken") {
            let mut errors = FieldErrors::new();
            errors.insert("name".into(), "Name is already registered".into());
            return Err(ClientError::Rejected {
                endpoint: "/submissions".into(),
                status: 400,
                body: ApiErrorBody::with_field_errors("Validation failed", errors),
            });
        }
        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.id != id);
        records.push(Submission {
            id: id.clone(),
            created_at: Utc::now(),
            data: values.clone(),
        });
        Ok(json!({ "success": true, "data": { "id": id } }))
    }
}

impl FormTransport for MemoryTransport {
    async fn fetch_schema(&self) -> Result<FormSchema, ClientError> {
        Ok(FormSchema {
            title: "Signup".into(),
            description: String::new(),
            fields: vec![
                FieldDescriptor::new("name", FieldType::Text, "Name")
                    .required()
                    .with_validation(ValidationRule::length(Some(2), None)),
                FieldDescriptor::new("age", FieldType::Number, "Age")
                    .with_validation(ValidationRule::range(Some(0.0), None)),
            ],
        })
    }

    async fn submit(&self, values: &FieldValues) -> Result<Value, ClientError> {
        let id = format!("rec-{}", self.records.lock().unwrap().len());
        self.store(id, values)
    }

    async fn update_record(&self, id: &str, values: &FieldValues) -> Result<Value, ClientError> {
        self.store(id.to_string(), values)
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResponse, ClientError> {
        let mut data = self.records.lock().unwrap().clone();
        data.sort_by_key(|r| r.created_at);
        if query.sort_order == SortOrder::Desc {
            data.reverse();
        }
        let total_count = data.len() as u64;
        Ok(PaginatedResponse {
            success: true,
            data,
            pagination: Pagination {
                page: 1,
                limit: query.limit,
                total_pages: 1,
                total_count,
            },
        })
    }

    async fn delete_record(&self, id: &str) -> Result<Value, ClientError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(ClientError::Rejected {
                endpoint: format!("/submissions/{id}"),
                status: 404,
                body: ApiErrorBody::message("Submission not found"),
            });
        }
        Ok(json!({ "success": true }))
    }
}

fn values_file(dir: &tempfile::TempDir, body: Value) -> std::path::PathBuf {
    let path = dir.path().join("values.json");
    std::fs::write(&path, body.to_string()).unwrap();
    path
}

fn list_args(order: SortOrder) -> ListArgs {
    ListArgs {
        page: 1,
        limit: 10,
        order,
        search: None,
        json: false,
    }
}

#[tokio::test]
async fn submit_creates_a_record() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MemoryTransport::default();
    let args = SubmitArgs {
        values: values_file(&dir, json!({ "name": "Ada", "age": 36 })),
        record: None,
    };
    let mut out = Vec::new();

    assert!(run_submit(&transport, &args, &mut out).await.unwrap());
    assert_eq!(String::from_utf8(out).unwrap(), "saved rec-0\n");
    assert_eq!(transport.names(), ["Ada"]);
}

#[tokio::test]
async fn locally_invalid_values_never_reach_the_server() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MemoryTransport::default();
    let args = SubmitArgs {
        values: values_file(&dir, json!({ "name": "A", "age": "old" })),
        record: None,
    };
    let mut out = Vec::new();

    assert!(!run_submit(&transport, &args, &mut out).await.unwrap());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("  name  Name must be at least 2 characters"));
    assert!(text.contains("  age  Age must be a valid number"));
    assert!(transport.names().is_empty());
}

#[tokio::test]
async fn server_rejection_prints_banner_and_field_message() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MemoryTransport::default();
    let args = SubmitArgs {
        values: values_file(&dir, json!({ "name": "taken" })),
        record: None,
    };
    let mut out = Vec::new();

    assert!(!run_submit(&transport, &args, &mut out).await.unwrap());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Validation failed\n  name  Name is already registered\n"
    );
}

#[tokio::test]
async fn unknown_field_in_values_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MemoryTransport::default();
    let args = SubmitArgs {
        values: values_file(&dir, json!({ "nickname": "Ada" })),
        record: None,
    };
    let err = run_submit(&transport, &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown field 'nickname'"));
}

#[tokio::test]
async fn submit_with_record_updates_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MemoryTransport::seeded(&["Ada"]);
    let args = SubmitArgs {
        values: values_file(&dir, json!({ "name": "Grace" })),
        record: Some("rec-0".into()),
    };

    assert!(run_submit(&transport, &args, &mut Vec::new()).await.unwrap());
    assert_eq!(transport.names(), ["Grace"]);
}

#[tokio::test]
async fn list_prints_newest_first_by_default() {
    let transport = MemoryTransport::seeded(&["Ada", "Grace"]);
    let mut out = Vec::new();

    run_list(&transport, &list_args(SortOrder::Desc), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("rec-1  2024-01-01 00:00  name=Grace"));
    assert!(lines[1].starts_with("rec-0"));
    assert_eq!(lines[2], "page 1 of 1 (2 total)");
}

#[tokio::test]
async fn deleting_a_missing_record_reports_the_server_message() {
    let transport = MemoryTransport::seeded(&["Ada"]);
    let mut out = Vec::new();

    let ok = run_delete(&transport, &DeleteArgs { id: "rec-9".into() }, &mut out)
        .await
        .unwrap();
    assert!(!ok);
    assert_eq!(String::from_utf8(out).unwrap(), "rec-9: Submission not found\n");

    let ok = run_delete(&transport, &DeleteArgs { id: "rec-0".into() }, &mut Vec::new())
        .await
        .unwrap();
    assert!(ok);
    assert!(transport.names().is_empty());
}

#[tokio::test]
async fn export_writes_csv_to_the_requested_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let transport = MemoryTransport::seeded(&["Ada", "Grace"]);
    let args = ExportArgs {
        list: list_args(SortOrder::Asc),
        out: Some(path.clone()),
    };
    let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();

    assert!(run_export(&transport, &args, today, &mut Vec::new())
        .await
        .unwrap());
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        csv,
        "ID,Created Date,name\n\
         rec-0,2024-01-01 00:00:00,\"Ada\"\n\
         rec-1,2024-01-01 00:00:01,\"Grace\""
    );
}

#[tokio::test]
async fn export_of_an_empty_page_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let transport = MemoryTransport::default();
    let args = ExportArgs {
        list: list_args(SortOrder::Desc),
        out: Some(path.clone()),
    };
    let mut out = Vec::new();

    let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
    assert!(!run_export(&transport, &args, today, &mut out).await.unwrap());
    assert!(!path.exists());
    assert_eq!(String::from_utf8(out).unwrap(), "No submissions to export.\n");
}
