use std::fs;
use std::path::PathBuf;

use indexmap::IndexSet;
use sdkgen_core::error::MappingError;
use sdkgen_core::ir::{ExtractedApi, Shape};
use sdkgen_core::mapping::{
    DEFAULT_SERVICE, MAPPING_FILE_NAME, MappingState, MappingTable, OperationMapping,
    apply_mappings, group_by_service, load_mapping,
};
use sdkgen_core::parse;
use sdkgen_core::transform::extract;

fn petstore() -> ExtractedApi {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.yaml");
    extract(&parse::load(&path).expect("fixture should load"))
}

fn table(json: &str) -> MappingTable {
    serde_json::from_str(json).expect("valid mapping json")
}

fn renaming_table() -> MappingTable {
    table(
        r#"{
            "operations": {
                "listPets": {"service": "pets", "method": "list"},
                "createPet": {"service": "pets", "method": "create"},
                "showPetById": {"service": "pets", "method": "get"},
                "getUsersById": {"service": "users", "method": "get"},
                "listPets2": "searchPets"
            },
            "schemas": {"Pet": "Animal", "PetStatus": "AnimalStatus"}
        }"#,
    )
}

#[test]
fn test_missing_file_bootstraps_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(MAPPING_FILE_NAME);
    assert_eq!(load_mapping(&path), MappingState::Missing);

    let api = petstore();
    let identity = MappingTable::identity(&api);
    assert_eq!(identity.operations.len(), api.operations.len());
    assert_eq!(identity.schemas.len(), api.schemas.len());
    for op in &api.operations {
        assert_eq!(
            identity.operation(&op.original_id),
            Some(&OperationMapping::Method(op.original_id.clone()))
        );
    }

    fs::write(&path, identity.to_json().unwrap()).unwrap();
    assert_eq!(load_mapping(&path), MappingState::Present(identity));
}

#[test]
fn test_identity_table_changes_nothing() {
    let api = petstore();
    let identity = MappingTable::identity(&api);
    let (ops, schemas) = apply_mappings(&api.operations, &api.schemas, &identity).unwrap();
    assert_eq!(ops, api.operations);
    assert_eq!(schemas, api.schemas);
}

#[test]
fn test_malformed_file_is_an_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(MAPPING_FILE_NAME);
    fs::write(&path, "{ not json").unwrap();
    assert_eq!(
        load_mapping(&path),
        MappingState::Present(MappingTable::default())
    );
}

#[test]
fn test_renames_reach_references() {
    let api = petstore();
    let (ops, schemas) =
        apply_mappings(&api.operations, &api.schemas, &renaming_table()).unwrap();

    let names: Vec<&str> = schemas.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Animal", "NewPet", "AnimalStatus", "User", "Error"]);
    assert_eq!(schemas[0].original_name, "Pet");

    let status = &schemas[0].shape.as_object().unwrap().properties["status"];
    assert_eq!(*status, Shape::Reference("AnimalStatus".into()));

    let list = ops.iter().find(|o| o.original_id == "listPets").unwrap();
    assert_eq!(list.id, "list");
    assert_eq!(
        list.response,
        Some(Shape::Array(Box::new(Shape::Reference("Animal".into()))))
    );

    let search = ops.iter().find(|o| o.original_id == "listPets2").unwrap();
    assert_eq!(search.id, "searchPets");

    let mut refs = IndexSet::new();
    for op in &ops {
        for shape in op.response.iter() {
            shape.collect_references(&mut refs);
        }
    }
    assert!(!refs.contains("Pet"));
}

#[test]
fn test_applying_twice_is_idempotent() {
    let api = petstore();
    let table = renaming_table();
    let once = apply_mappings(&api.operations, &api.schemas, &table).unwrap();
    let twice = apply_mappings(&once.0, &once.1, &table).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_grouping_partitions_every_operation() {
    let api = petstore();
    let table = renaming_table();
    let (ops, _) = apply_mappings(&api.operations, &api.schemas, &table).unwrap();
    let groups = group_by_service(&ops, &table).unwrap();

    assert_eq!(
        groups.names().collect::<Vec<_>>(),
        ["pets", "default", "users"]
    );
    assert_eq!(groups.operation_count(), ops.len());

    let pets: Vec<&str> = groups
        .get("pets")
        .unwrap()
        .iter()
        .map(|o| o.id.as_str())
        .collect();
    assert_eq!(pets, ["list", "create", "get"]);

    let default: Vec<&str> = groups
        .get(DEFAULT_SERVICE)
        .unwrap()
        .iter()
        .map(|o| o.id.as_str())
        .collect();
    assert_eq!(
        default,
        [
            "searchPets",
            "deletePetsByPetId",
            "uploadPhoto",
            "getWidgetPart"
        ]
    );
}

#[test]
fn test_same_method_twice_in_a_service_is_rejected() {
    let api = petstore();
    let table = table(
        r#"{"operations": {
            "listPets": {"service": "pets", "method": "list"},
            "listPets2": {"service": "pets", "method": "list"}
        }}"#,
    );
    let (ops, _) = apply_mappings(&api.operations, &api.schemas, &table).unwrap();
    let err = group_by_service(&ops, &table).unwrap_err();
    assert_eq!(
        err,
        MappingError::DuplicateMethod {
            service: "pets".into(),
            method: "list".into(),
            first: "listPets".into(),
            second: "listPets2".into(),
        }
    );
}

#[test]
fn test_same_method_in_different_services_is_fine() {
    let api = petstore();
    let table = table(
        r#"{"operations": {
            "showPetById": {"service": "pets", "method": "get"},
            "getUsersById": {"service": "users", "method": "get"}
        }}"#,
    );
    let (ops, _) = apply_mappings(&api.operations, &api.schemas, &table).unwrap();
    assert!(group_by_service(&ops, &table).is_ok());
}

#[test]
fn test_bad_identifiers_are_errors() {
    let api = petstore();

    let empty = table(r#"{"operations": {"createPet": "  "}}"#);
    assert!(matches!(
        apply_mappings(&api.operations, &api.schemas, &empty),
        Err(MappingError::EmptyIdentifier { original, .. }) if original == "createPet"
    ));

    let digit = table(r#"{"schemas": {"User": "2User"}}"#);
    assert!(matches!(
        apply_mappings(&api.operations, &api.schemas, &digit),
        Err(MappingError::InvalidIdentifier { original, .. }) if original == "User"
    ));

    let clash = table(r#"{"schemas": {"User": "Error"}}"#);
    assert_eq!(
        apply_mappings(&api.operations, &api.schemas, &clash).unwrap_err(),
        MappingError::DuplicateSchema {
            name: "Error".into(),
            first: "User".into(),
            second: "Error".into(),
        }
    );
}

#[test]
fn test_unchanged_names_are_repaired() {
    let mut api = petstore();
    for (op, original) in api.operations.iter_mut().zip(["list-pets", "list_pets"]) {
        op.id = original.into();
        op.original_id = original.into();
    }
    let user = api.schemas.iter_mut().find(|s| s.name == "User").unwrap();
    user.name = "3d-user".into();
    user.original_name = "3d-user".into();

    for mapping in [r#"{}"#, r#"{"schemas": {"3d-user": "3d-user"}}"#] {
        let (ops, schemas) =
            apply_mappings(&api.operations, &api.schemas, &table(mapping)).unwrap();
        let ids: Vec<&str> = ops.iter().take(3).map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["listPets", "listPets2", "listPets22"]);
        assert!(schemas.iter().any(|s| s.name == "Schema3dUser"));
    }

    let chosen = table(r#"{"schemas": {"3d-user": "3d-user-v2"}}"#);
    assert!(matches!(
        apply_mappings(&api.operations, &api.schemas, &chosen),
        Err(MappingError::InvalidIdentifier { original, .. }) if original == "3d-user"
    ));
}

#[test]
fn test_unlisted_entries_keep_their_names() {
    let api = petstore();
    let partial = table(r#"{"operations": {"createPet": "addPet"}}"#);
    let (ops, schemas) = apply_mappings(&api.operations, &api.schemas, &partial).unwrap();
    assert_eq!(ops[1].id, "addPet");
    assert_eq!(ops[0].id, "listPets");
    assert_eq!(schemas, api.schemas);
}
