use co2e_portal::workflows::audit::{
    AuditService, AuditStore, CompanyId, Department, FieldValue, InMemoryAuditStore,
    QuestionCatalog,
};
use co2e_portal::workflows::snapshot::{SnapshotImportError, SnapshotImporter};
use std::sync::Arc;

const SNAPSHOT: &str = "\
company_id,department,field_id,value
harbor,company,name,Harbor Logistics
harbor,company,contact_name,Ines Vos
harbor,warehouse,annual_electricity,40000
harbor,warehouse,forklift_count,6
harbor,warehouse,waste_streams,recycling;landfill
harbor,kitchen,annual_electricity,5000
harbor,kitchen,kitchen_appliances,fryer
";

fn catalog() -> QuestionCatalog {
    QuestionCatalog::load().expect("standard catalog is valid")
}

#[test]
fn snapshot_seeds_store_for_service_summary() {
    let catalog = catalog();
    let snapshot =
        SnapshotImporter::from_reader(SNAPSHOT.as_bytes(), &catalog).expect("snapshot parses");

    let store = Arc::new(InMemoryAuditStore::new());
    let saved = snapshot.seed(store.as_ref()).expect("seed succeeds");
    assert_eq!(saved, 2);

    let company = CompanyId("harbor".to_string());
    let kitchen = store
        .get_record(&company, Department::Kitchen)
        .expect("store available")
        .expect("kitchen seeded");
    assert_eq!(
        kitchen.fields["kitchen_appliances"],
        FieldValue::Multi(vec!["fryer".to_string()])
    );

    let service = AuditService::new(store, Arc::new(catalog));
    let summary = service.summary(&company);
    let departments: Vec<Department> = summary
        .departments
        .iter()
        .map(|entry| entry.department)
        .collect();
    assert!(departments.contains(&Department::Warehouse));
    assert!(departments.contains(&Department::Kitchen));
    // Kitchen falls back to electricity only: 16.8 t + 2.1 t.
    assert!((summary.total_co2e_tons - 18.9).abs() < 1e-9);

    let info = service
        .company_info(&company)
        .expect("store available")
        .expect("company info seeded");
    assert_eq!(info.name.as_deref(), Some("Harbor Logistics"));
}

#[test]
fn missing_snapshot_file_is_an_io_error() {
    let result = SnapshotImporter::from_path("/nonexistent/co2e-snapshot.csv", &catalog());
    assert!(matches!(result, Err(SnapshotImportError::Io(_))));
}

#[test]
fn short_rows_are_csv_errors() {
    let csv = "company_id,department,field_id,value\nharbor,office\n";
    let result = SnapshotImporter::from_reader(csv.as_bytes(), &catalog());
    assert!(matches!(result, Err(SnapshotImportError::Csv(_))));
}
