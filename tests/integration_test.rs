use clap::Parser;
use docs_from_source::{
    cli::{self, CliArgs},
    extractor::{HttpMethod, Permission, QueryKind},
    module_info::ModuleInfo,
    renderer::DocRenderer,
    scanner::ModuleLocator,
    serializer::serialize_json,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const TYPES: &str = include_str!("fixtures/customers/customers.types.go");
const ROUTES: &str = include_str!("fixtures/customers/customers.routes.go");
const CONTROLLERS: &str = include_str!("fixtures/customers/customers.controllers.go");
const QUERIES: &str = include_str!("fixtures/queries/customers.sql");

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn customers_project() -> TempDir {
    create_test_project(vec![
        ("modules/customers/customers.types.go", TYPES),
        ("modules/customers/customers.routes.go", ROUTES),
        ("modules/customers/customers.controllers.go", CONTROLLERS),
        ("db/queries/customers.sql", QUERIES),
    ])
}

fn analyze_customers(temp_dir: &TempDir) -> ModuleInfo {
    let locator = ModuleLocator::new(
        temp_dir.path().join("modules"),
        temp_dir.path().join("db/queries"),
    );
    let files = locator.locate("customers").expect("Failed to locate module");
    let sources = files.read_sources().expect("Failed to read sources");
    ModuleInfo::analyze(&files.name, &files.module_path, &sources)
}

#[test]
fn test_module_model_from_fixture() {
    let temp_dir = customers_project();
    let info = analyze_customers(&temp_dir);

    assert_eq!(info.base_url, "customers");
    assert_eq!(
        info.types.names().collect::<Vec<_>>(),
        vec![
            "CreateCustomerRequest",
            "UpdateCustomerRequest",
            "CustomerFilters",
            "CustomerResponse",
        ]
    );

    let routes: Vec<(HttpMethod, &str, &str)> = info
        .endpoints
        .iter()
        .map(|e| (e.method, e.path.as_str(), e.handler_name.as_str()))
        .collect();
    assert_eq!(
        routes,
        vec![
            (HttpMethod::Get, "/customers", "GetCustomers"),
            (HttpMethod::Get, "/customers/:id", "GetCustomerByID"),
            (HttpMethod::Post, "/customers", "CreateCustomer"),
            (HttpMethod::Patch, "/customers/:id", "UpdateCustomer"),
            (HttpMethod::Delete, "/customers/:id", "DeleteCustomer"),
            (HttpMethod::Get, "/customers/public/lookup", "LookupCustomer"),
        ]
    );

    assert_eq!(info.endpoints[0].permission.to_string(), "Customers:index");
    assert_eq!(info.endpoints[3].permission.to_string(), "Customers:update");
    assert_eq!(info.endpoints[4].permission, Permission::Auth);
    assert_eq!(info.endpoints[5].permission, Permission::Public);

    assert_eq!(
        info.endpoints[2].request_type_name.as_deref(),
        Some("CreateCustomerRequest")
    );
    assert_eq!(
        info.endpoints[3].request_type_name.as_deref(),
        Some("UpdateCustomerRequest")
    );
    assert_eq!(info.endpoints[4].request_type_name, None);

    let filters: Vec<&str> = info.filters.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(filters, vec!["status", "branch_id", "q", "vip_only"]);

    assert_eq!(
        info.sortable_fields,
        vec!["branch_id", "created_at", "email", "full_name"]
    );

    let kinds: Vec<QueryKind> = info.sql_queries.iter().map(|q| q.kind).collect();
    assert_eq!(
        kinds,
        vec![QueryKind::One, QueryKind::Many, QueryKind::One, QueryKind::ExecRows]
    );
    assert_eq!(info.sql_queries[1].parameter_ordinals, vec![1, 2, 3]);
    assert_eq!(info.table_name, "customers");
    assert_eq!(info.primary_key_column, "customer_id");
}

#[test]
fn test_rendered_api_document() {
    let temp_dir = customers_project();
    let docs = DocRenderer::render(&analyze_customers(&temp_dir));

    assert!(docs
        .api
        .starts_with("# Customers API Documentation\n\nBase URL: `/api/v1/customers`\n"));
    assert!(docs
        .api
        .contains("| `GET` | `/customers/:id` | Get Customer By ID | Customers:read |"));
    assert!(docs
        .api
        .contains("| `DELETE` | `/customers/:id` | Delete Customer | Auth |"));

    assert!(docs.api.contains("  \"full_name\": \"John Doe\",\n"));
    assert!(docs.api.contains("  \"phone\": \"+84123456789\",\n"));
    assert!(docs.api.contains("  \"is_vip\": true,\n"));
    assert!(docs.api.contains("  \"metadata\": {}\n}"));
    assert!(docs
        .api
        .contains("| `full_name` | `string` | ✓ | min=2, max=120 | - |"));
    assert!(docs
        .api
        .contains("| `phone` | `*string` |  | e164 | International format |"));

    // The listing endpoint is paginated, the lookup by id is not
    let listing = docs.api.split("### GET `/customers`\n").nth(1).unwrap();
    assert!(listing.split("---").next().unwrap().contains("\"pagination\""));
    let by_id = docs.api.split("### GET `/customers/:id`\n").nth(1).unwrap();
    assert!(by_id.split("---").next().unwrap().contains("\"data\": {...}"));

    assert!(docs
        .api
        .contains("{\n  \"status\": [1, 2],\n  \"branch_id\": 1,\n  \"q\": \"value\"\n}"));
    assert!(docs.api.contains("- `branch_id`\n- `created_at`\n- `email`\n- `full_name`\n"));
}

#[test]
fn test_rendered_database_document() {
    let temp_dir = customers_project();
    let docs = DocRenderer::render(&analyze_customers(&temp_dir));

    let expected_table = [
        "## Table: `customers`",
        "",
        "| Column | Type | Nullable | Default | Description |",
        "|--------|------|----------|---------|-------------|",
        "| `customer_id` | `int4` | No | serial | Primary key |",
        "| `full_name` | `varchar` | Yes | - | Full Name |",
        "| `email` | `varchar` | Yes | - | Email |",
        "| `branch_id` | `int4` | Yes | - | Branch Id |",
        "| `created_at` | `timestamp` | Yes | - | Created At |",
        "",
    ]
    .join("\n");
    assert!(
        docs.database.contains(&expected_table),
        "unexpected table in:\n{}",
        docs.database
    );

    assert!(docs.database.contains("### ListCustomers\n\n**Type:** `:many`  \n**Parameters:** $1, $2, $3\n"));
    assert!(docs.database.contains("### SoftDeleteCustomer\n\n**Type:** `:execrows`  \n"));
    assert!(!docs.database.contains("Queries for the customers module"));
}

#[test]
fn test_cli_writes_documents_into_module_directory() {
    let temp_dir = customers_project();
    let root = temp_dir.path().to_string_lossy().to_string();
    let args = CliArgs::try_parse_from(["docs-from-source", "customers", "-r", &root]).unwrap();
    let args = cli::parse_args_from_parsed(args).unwrap();

    let summaries = cli::run(args).unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].endpoints, 6);
    assert_eq!(summaries[0].types, 4);
    assert_eq!(summaries[0].queries, 4);

    let module_dir = temp_dir.path().join("modules/customers");
    let api = fs::read_to_string(module_dir.join("API.md")).unwrap();
    let database = fs::read_to_string(module_dir.join("DATABASE.md")).unwrap();
    assert!(api.starts_with("# Customers API Documentation"));
    assert!(database.starts_with("# Customers Database Structure"));
}

#[test]
fn test_cli_all_documents_every_module() {
    let temp_dir = create_test_project(vec![
        ("modules/customers/customers.types.go", TYPES),
        ("modules/customers/customers.routes.go", ROUTES),
        (
            "modules/customer/customer.invoices/customer.invoices.routes.go",
            "router := rg.Group(\"/invoices\")\nrouter.GET(\"\", ctrl.ListInvoices)\n",
        ),
        ("modules/shared/helpers.go", "package shared\n"),
    ]);
    let root = temp_dir.path().to_string_lossy().to_string();
    let args = CliArgs::try_parse_from(["docs-from-source", "--all", "-r", &root]).unwrap();

    let summaries = cli::run(args).unwrap();

    let paths: Vec<&str> = summaries.iter().map(|s| s.module_path.as_str()).collect();
    assert_eq!(paths, vec!["customer/customer.invoices", "customers"]);

    // No query file: the schema falls back to names derived from the module
    let database = fs::read_to_string(
        temp_dir
            .path()
            .join("modules/customer/customer.invoices/DATABASE.md"),
    )
    .unwrap();
    assert!(database.starts_with("# Customer Invoices Database Structure\n\n## Table: `customer_invoices`\n"));
    assert!(database.contains("| `customer_invoice_id` | `int4` | No | serial | Primary key |"));
    assert!(!temp_dir.path().join("modules/shared/API.md").exists());
}

#[test]
fn test_module_without_sources_still_renders() {
    let temp_dir = create_test_project(vec![("modules/empty/.keep", "")]);
    let locator = ModuleLocator::new(
        temp_dir.path().join("modules"),
        temp_dir.path().join("db/queries"),
    );

    let files = locator.locate("empty").unwrap();
    let info = ModuleInfo::analyze(&files.name, &files.module_path, &files.read_sources().unwrap());
    let docs = DocRenderer::render(&info);

    assert_eq!(info.base_url, "empty");
    assert!(docs.api.contains("Base URL: `/api/v1/empty`"));
    assert!(docs.database.contains("## Table: `empty`"));
    assert!(docs.database.contains("| `empty_id` | `int4` | No | serial | Primary key |"));
}

#[test]
fn test_model_export_json() {
    let temp_dir = customers_project();
    let json = serialize_json(&analyze_customers(&temp_dir)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["base_url"], "customers");
    assert_eq!(value["endpoints"][2]["method"], "POST");
    assert_eq!(value["endpoints"][2]["permission"], "Customers:create");
    assert_eq!(value["sql_queries"][3]["kind"], "execrows");
    assert_eq!(value["types"][0]["name"], "CreateCustomerRequest");
}
