use std::path::PathBuf;

use sdkgen_core::mapping::{MappingState, MappingTable};
use sdkgen_core::pipeline::{PipelineOptions, Prepared, prepare};
use sdkgen_core::render::{ArtifactKind, GeneratorOptions, Layout};
use sdkgen_core::{CodeGenerator, GenerationModel, GeneratorError, MappingError, parse, transform};
use sdkgen_python::PythonGenerator;

fn model(fixture: &str, mapping: &str) -> GenerationModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../sdkgen-core/tests/fixtures")
        .join(fixture);
    let api = transform::extract(&parse::load(&path).expect("fixture should load"));
    let table: MappingTable = serde_json::from_str(mapping).unwrap();
    match prepare(api, MappingState::Present(table), PipelineOptions::default()).unwrap() {
        Prepared::Ready(model) => model,
        Prepared::Bootstrap(_) => panic!("expected a model"),
    }
}

fn render(model: &GenerationModel, kind: ArtifactKind) -> String {
    PythonGenerator
        .render(kind, model, &GeneratorOptions::default())
        .unwrap()
}

#[test]
fn test_file_plan() {
    let streaming = model("streaming.yaml", "{}");
    let files = PythonGenerator
        .generate(&streaming, &GeneratorOptions::default())
        .unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "types.py",
            "schemas.py",
            "runtime.py",
            "client.py",
            "services.py",
            "streaming.py",
            "__init__.py"
        ]
    );

    let options = GeneratorOptions {
        layout: Layout::Flat,
        ..GeneratorOptions::default()
    };
    let files = PythonGenerator
        .generate(&model("petstore.yaml", "{}"), &options)
        .unwrap();
    assert!(!files.iter().any(|f| f.path == "services.py"));
    assert!(!files.iter().any(|f| f.path == "streaming.py"));
}

#[test]
fn test_typed_dicts() {
    let out = render(&model("petstore.yaml", "{}"), ArtifactKind::Types);
    assert!(out.starts_with("# Generated by sdkgen from Petstore 1.2.0. Do not edit.\n"));
    assert!(out.contains(
        "class Pet(TypedDict):\n    \"\"\"A pet in the store.\"\"\"\n\n    name: str\n    tag: NotRequired[str]\n    id: int\n    status: NotRequired[PetStatus]\n"
    ));
    assert!(out.contains("\n\n\nPetStatus = Literal[\"available\", \"pending\", \"sold\"]\n"));
}

#[test]
fn test_pydantic_models() {
    let out = render(&model("petstore.yaml", "{}"), ArtifactKind::Validators);
    assert!(out.contains(
        "class Pet(BaseModel):\n    \"\"\"A pet in the store.\"\"\"\n\n    model_config = ConfigDict(populate_by_name=True)\n\n    name: str\n    tag: str | None = None\n    id: int\n    status: PetStatus | None = None\n"
    ));
    assert!(out.contains("\nPet.model_rebuild()\n"));
    assert!(!out.contains("PetStatus.model_rebuild()"));
}

#[test]
fn test_flat_client() {
    let out = render(&model("petstore.yaml", "{}"), ArtifactKind::FlatClient);

    assert!(out.contains("from .types import NewPet, Pet, User\n"));
    assert!(!out.contains(".streaming"));
    assert!(out.contains("class ApiClient:\n"));
    assert!(out.contains("    def set_token(self, token: str | None) -> None:\n"));
    assert!(out.contains(
        "    def list_pets(self, *, tag: list[str], limit: int | None = None) -> list[Pet]:\n        \"\"\"List all pets\"\"\"\n        return self._transport.request(\"GET\", \"/pets\", query={\"limit\": limit, \"tag\": tag})\n"
    ));
    assert!(out.contains(
        "    def create_pet(self, body: NewPet) -> Pet:\n        return self._transport.request(\"POST\", \"/pets\", body=body)\n"
    ));
    assert!(out.contains(
        "    def get_users_by_id(self, id: str) -> User:\n        return self._transport.request(\"GET\", \"/users/{id}\", path_params={\"id\": id})\n"
    ));
    assert!(out.contains(
        "    def get_widget_part(self, id: str, part_id: int, *, verbose: bool | None = None) -> dict[str, int]:\n"
    ));
    assert!(out.contains(
        "path_params={\"id\": id, \"partId\": part_id}, query={\"verbose\": verbose})"
    ));
    assert!(out.contains(
        "    def delete_pets_by_pet_id(self, pet_id: int) -> None:\n        \"\"\"Deprecated.\"\"\"\n"
    ));
}

#[test]
fn test_streaming_generators() {
    let streaming = model("streaming.yaml", "{}");
    let out = render(&streaming, ArtifactKind::FlatClient);
    assert!(out.contains("from .streaming import iter_ndjson, iter_sse\n"));
    assert!(out.contains(
        "    def create_chat_completion(self, body: ChatRequest) -> Iterator[ChatChunk]:\n        response = self._transport.stream(\"POST\", \"/chat/completions\", body=body, accept=\"text/event-stream\")\n        yield from iter_sse(response)\n"
    ));
    assert!(out.contains("    def tail_logs(self) -> Iterator[LogLine]:\n"));
    assert!(out.contains("    def get_status(self) -> dict[str, Any]:\n"));

    let helpers = render(&streaming, ArtifactKind::Streaming);
    assert!(helpers.contains("def iter_sse(response: requests.Response) -> Iterator[Any]:"));
    assert!(helpers.contains("if payload == \"[DONE]\":"));
    assert!(helpers.contains("    finally:\n        response.close()\n"));
}

#[test]
fn test_services() {
    let petstore = model(
        "petstore.yaml",
        r#"{
            "operations": {
                "listPets": {"service": "pets", "method": "list"},
                "getUsersById": {"service": "user accounts", "method": "fetch"}
            },
            "schemas": {"User": "Account"}
        }"#,
    );
    let out = render(&petstore, ArtifactKind::ServiceClient);

    assert!(out.contains("from .types import Account, NewPet, Pet\n"));
    assert!(out.contains(
        "class PetsService:\n    def __init__(self, transport: Transport) -> None:\n        self._transport = transport\n\n    def list(self, *, tag: list[str], limit: int | None = None) -> list[Pet]:\n"
    ));
    assert!(out.contains("    def fetch(self, id: str) -> Account:\n"));
    assert!(out.contains("        self.pets = PetsService(self._transport)\n"));
    assert!(out.contains("        self.user_accounts = UserAccountsService(self._transport)\n"));
    assert!(out.contains("    def create_pet(self, body: NewPet) -> Pet:\n"));
}

#[test]
fn test_quotes_and_argument_collisions() {
    let edge = model("edge_cases.yaml", "{}");

    let client = render(&edge, ArtifactKind::FlatClient);
    assert!(client.contains(
        "    def get_item(self, id: str, *, page_size: int | None = None, page_size_2: int | None = None, id_2: str | None = None) -> Item:\n"
    ));
    assert!(client.contains("        \"\"\"Say \\\"hi\\\"\"\"\"\n"));
    assert!(client.contains(
        "query={\"page_size\": page_size, \"pageSize\": page_size_2, \"id\": id_2}"
    ));

    for kind in [ArtifactKind::Types, ArtifactKind::Validators] {
        let out = render(&edge, kind);
        assert!(out.contains("    \"\"\"An \\\"item\\\"\"\"\"\n"), "{kind:?}");
    }
}

#[test]
fn test_runtime_and_init() {
    let petstore = model("petstore.yaml", "{}");
    let options = GeneratorOptions {
        base_url: Some("http://localhost:8000".into()),
        timeout: 10,
        ..GeneratorOptions::default()
    };
    let runtime = PythonGenerator
        .render(ArtifactKind::Runtime, &petstore, &options)
        .unwrap();
    assert!(runtime.contains("DEFAULT_BASE_URL = \"http://localhost:8000\"\n"));
    assert!(runtime.contains("DEFAULT_TIMEOUT = 10\n"));
    assert!(runtime.contains("class ApiClientConfig:\n"));
    assert!(runtime.contains("self.session.headers[\"Authorization\"] = f\"Bearer {token}\""));

    let init = render(&petstore, ArtifactKind::Index);
    assert!(init.contains("from .client import ApiClient\n"));
    assert!(init.contains("from .services import ServiceClient\n"));
    assert!(init.contains("    \"PetStatus\",\n"));
    assert!(!init.contains("iter_sse"));
}

#[test]
fn test_flat_collision_is_reported() {
    let petstore = model(
        "petstore.yaml",
        r#"{"operations": {
            "showPetById": {"service": "pets", "method": "get"},
            "getUsersById": {"service": "users", "method": "get"}
        }}"#,
    );
    let err = PythonGenerator
        .render(ArtifactKind::FlatClient, &petstore, &GeneratorOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::Mapping(MappingError::DuplicateMethod { .. })
    ));

    let services = render(&petstore, ArtifactKind::ServiceClient);
    assert!(services.contains("class PetsService:\n"));
    assert!(services.contains("class UsersService:\n"));
    assert!(services.contains("    def get(self, pet_id: int) -> Pet:\n"));
    assert!(services.contains("    def get(self, id: str) -> User:\n"));
}

#[test]
fn test_schema_names_that_shadow_generated_code() {
    for (name, mapping) in [
        ("BaseModel", r#"{"schemas": {"User": "BaseModel"}}"#),
        ("Any", r#"{"schemas": {"User": "Any"}}"#),
        (
            "PetsService",
            r#"{"schemas": {"User": "PetsService"}, "operations": {"listPets": {"service": "pets", "method": "list"}}}"#,
        ),
    ] {
        let petstore = model("petstore.yaml", mapping);
        let err = PythonGenerator
            .render(ArtifactKind::Validators, &petstore, &GeneratorOptions::default())
            .unwrap_err();
        assert!(
            matches!(&err, GeneratorError::ReservedName { name: n, original, .. } if n == name && original == "User"),
            "{name}: {err}"
        );
    }

    // Validator consts are a TypeScript concern only.
    let pet_schema = model("petstore.yaml", r#"{"schemas": {"User": "PetSchema"}}"#);
    assert!(
        PythonGenerator
            .generate(&pet_schema, &GeneratorOptions::default())
            .is_ok()
    );
}
