use asset_registry::{
    models::{
        AssetFields, AssetFilter, AssetStatus, CategoryFilter, EmployeeFields, EmployeeFilter,
        IssueRequest, RecordStatus, ScrapRequest, TransactionType,
    },
    ApiError, RegistryClient,
};
use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn client_for(server: &MockServer) -> RegistryClient {
    RegistryClient::new(&format!("{}/api", server.uri())).unwrap()
}

fn laptop() -> serde_json::Value {
    json!({
        "id": 7,
        "assetId": "LAP-007",
        "serialNumber": "SN-7",
        "categoryId": 2,
        "make": "Lenovo",
        "model": "T14",
        "purchaseDate": "2024-01-15T00:00:00.000Z",
        "purchasePrice": "84999.00",
        "branch": "Pune",
        "status": "available",
        "category": {"id": 2, "name": "Laptop", "status": "active"}
    })
}

#[tokio::test]
async fn list_sends_filters_as_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets"))
        .and(query_param("status", "assigned"))
        .and(query_param("categoryId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([laptop()])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let filter = AssetFilter {
        status: Some(AssetStatus::Assigned),
        category_id: Some(2),
    };
    let assets = client.assets().list(&filter).await.unwrap();

    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].asset_id, "LAP-007");
    assert_eq!(assets[0].purchase_price, Some(dec!(84999.00)));
    assert_eq!(assets[0].category_name(), Some("Laptop"));
}

#[tokio::test]
async fn employee_and_category_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "employeeId": "EMP001", "firstName": "Ravi", "lastName": "Kumar",
             "email": "ravi@corp.in"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "Laptop", "status": "active"},
            {"id": 3, "name": "Phone", "status": "inactive"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let employees = client
        .employees()
        .list(&EmployeeFilter {
            status: Some(RecordStatus::Active),
        })
        .await
        .unwrap();
    assert_eq!(employees[0].label(), "Ravi Kumar (EMP001)");

    let categories = client.categories().list(&CategoryFilter::default()).await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].status, RecordStatus::Inactive);
}

#[tokio::test]
async fn create_and_update_send_fields_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/employees"))
        .and(body_json(json!({
            "employeeId": "EMP009",
            "firstName": "Lata",
            "lastName": "Iyer",
            "email": "lata@corp.in",
            "phone": null,
            "department": "Finance",
            "designation": null,
            "branch": null,
            "status": "active",
            "joiningDate": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "employeeId": "EMP009", "firstName": "Lata", "lastName": "Iyer",
            "email": "lata@corp.in", "department": "Finance", "status": "active"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/assets/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(laptop()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let mut fields = EmployeeFields::new("EMP009", "Lata", "Iyer", "lata@corp.in");
    fields.department = Some("Finance".into());
    let created = client.employees().create(&fields).await.unwrap();
    assert_eq!(created.id, 9);

    let updated = client
        .assets()
        .update(7, &AssetFields::new("LAP-007", "SN-7", 2))
        .await
        .unwrap();
    assert_eq!(updated.id, 7);

    let requests = server.received_requests().await.unwrap();
    let put: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(put["categoryId"], 2);
    assert_eq!(put["status"], "available");
}

#[tokio::test]
async fn delete_targets_the_record() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.categories().delete(3).await.unwrap();
}

#[tokio::test]
async fn custody_operations_post_single_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/assets/issue"))
        .and(body_json(json!({"assetId": 7, "employeeId": 1, "remarks": "new joiner"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/assets/scrap"))
        .and(body_json(json!({"assetId": 7, "reason": "Beyond Repair", "remarks": "water damage"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .assets()
        .issue(&IssueRequest {
            asset_id: 7,
            employee_id: 1,
            remarks: "new joiner".into(),
        })
        .await
        .unwrap();
    client
        .assets()
        .scrap(&ScrapRequest {
            asset_id: 7,
            reason: "Beyond Repair".into(),
            remarks: "water damage".into(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn history_decodes_asset_and_transactions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets/7/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset": laptop(),
            "transactions": [
                {"id": 1, "assetId": 7, "employeeId": 1, "type": "issue",
                 "transactionDate": "2024-02-01T09:30:00.000Z", "remarks": "",
                 "employee": {"id": 1, "employeeId": "EMP001", "firstName": "Ravi",
                              "lastName": "Kumar"}},
                {"id": 2, "assetId": 7, "employeeId": null, "type": "return",
                 "transactionDate": "2024-03-01T09:30:00.000Z", "reason": "Upgrade"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let history = client.assets().history(7).await.unwrap();
    assert_eq!(history.asset.id, 7);
    assert_eq!(history.transactions.len(), 2);
    assert_eq!(history.transactions[0].kind, TransactionType::Issue);
    assert_eq!(history.transactions[1].reason.as_deref(), Some("Upgrade"));
}

#[tokio::test]
async fn non_success_status_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Asset not found"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/assets/issue"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let err = client.assets().get(99).await.unwrap_err();
    assert_matches!(
        err,
        ApiError::Server { status: 404, ref message } if message == "Asset not found"
    );

    let err = client
        .assets()
        .issue(&IssueRequest {
            asset_id: 1,
            employee_id: 1,
            remarks: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .employees()
        .list(&EmployeeFilter::default())
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Decode(_));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = RegistryClient::new("http://127.0.0.1:1/api").unwrap();

    let err = client.categories().list(&CategoryFilter::default()).await.unwrap_err();
    assert_matches!(err, ApiError::Network(_));
}
