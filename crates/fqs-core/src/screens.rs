//! Per-resource list/edit screens for complaints, commendations, requests
//! and persons.
//!
//! Each screen keeps the last fetched list, validates forms before any
//! request, and reloads after every successful mutation.

use std::marker::PhantomData;

use thiserror::Error;

use crate::backend::{BackendError, ResourceBackend};
use crate::models::{
    CaseStatus, Commendation, CommendationUpdate, Commendations, Complaint, ComplaintUpdate,
    Complaints, NewCommendation, NewComplaint, NewRequest, Person, PersonInput, Persons, Request,
    RequestUpdate, Requests, Resource,
};
use crate::search::{contains_lower, normalize_query};

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("{0}")]
    Validation(String),

    #[error("Status changes are not supported for this resource")]
    StatusNotSupported,

    #[error("Record {0} is not loaded")]
    NotFound(u64),

    #[error("{fallback}: {source}")]
    Backend {
        fallback: &'static str,
        #[source]
        source: BackendError,
    },
}

impl ScreenError {
    /// Alert text: the server's message when it sent one, else the screen default.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { fallback, source } => source.user_message(fallback),
            other => other.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Backend { source, .. } if source.is_session_expired())
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

pub const RESOLVE_NEEDS_NOTE: &str = "Se requiere una respuesta para resolver el caso";

// =========================================================================
// Forms
// =========================================================================

/// Form shared by the three case screens. Fields hold raw user input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseForm {
    pub description: String,
    pub area: String,
    pub person_id: String,
}

/// Person form. Blank optional fields are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonForm {
    pub name: String,
    pub hc_code: String,
    pub insurance: String,
    pub business: String,
    pub status: String,
    pub area: String,
}

struct ValidCase {
    description: String,
    area: String,
    person_id: u64,
}

fn require(value: &str, field: &str) -> ScreenResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScreenError::Validation(format!("El campo {} es obligatorio", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a person reference typed by the operator.
pub fn parse_person_id(raw: &str) -> ScreenResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ScreenError::Validation(format!(
            "El ID de persona debe ser un número entero positivo: '{}'",
            raw.trim()
        ))),
    }
}

impl CaseForm {
    fn validate(&self) -> ScreenResult<ValidCase> {
        Ok(ValidCase {
            description: require(&self.description, "descripción")?,
            area: require(&self.area, "área")?,
            person_id: parse_person_id(&self.person_id)?,
        })
    }

    fn from_parts(description: &str, area: &str, person_id: u64) -> Self {
        Self {
            description: description.to_string(),
            area: area.to_string(),
            person_id: person_id.to_string(),
        }
    }
}

impl PersonForm {
    fn to_input(&self) -> ScreenResult<PersonInput> {
        Ok(PersonInput {
            name: Some(require(&self.name, "nombre")?),
            hc_code: Some(require(&self.hc_code, "código HC")?),
            insurance: optional(&self.insurance),
            business: optional(&self.business),
            status: optional(&self.status),
            area: optional(&self.area),
            user_id: None,
        })
    }
}

// =========================================================================
// Screen behavior per resource
// =========================================================================

/// What a list/edit screen needs to know about its resource.
pub trait ScreenResource: Resource {
    type Form: Clone + Default;

    const LOAD_FAILED: &'static str;
    const SAVE_FAILED: &'static str;
    const DELETE_FAILED: &'static str;

    fn record_id(record: &Self::Record) -> u64;

    /// `query_lower` is already lowercased.
    fn matches(record: &Self::Record, query_lower: &str) -> bool;

    /// Lifecycle status, for resources that have one.
    fn status(_record: &Self::Record) -> Option<CaseStatus> {
        None
    }

    fn form_for(record: &Self::Record) -> Self::Form;

    fn validate_create(form: &Self::Form) -> ScreenResult<Self::Create>;

    fn validate_update(form: &Self::Form) -> ScreenResult<Self::Update>;

    /// Payload that only moves the status, when supported.
    fn status_update(_status: CaseStatus) -> Option<Self::Update> {
        None
    }
}

impl ScreenResource for Complaints {
    type Form = CaseForm;

    const LOAD_FAILED: &'static str = "Error al cargar las quejas";
    const SAVE_FAILED: &'static str = "Error al guardar la queja";
    const DELETE_FAILED: &'static str = "Error al eliminar la queja";

    fn record_id(record: &Complaint) -> u64 {
        record.id
    }

    fn matches(record: &Complaint, query_lower: &str) -> bool {
        record.description.to_lowercase().contains(query_lower)
            || record.area.to_lowercase().contains(query_lower)
            || contains_lower(record.person.as_ref().map(|p| p.name.as_str()), query_lower)
    }

    fn status(record: &Complaint) -> Option<CaseStatus> {
        Some(record.status)
    }

    fn form_for(record: &Complaint) -> CaseForm {
        CaseForm::from_parts(&record.description, &record.area, record.person_id)
    }

    fn validate_create(form: &CaseForm) -> ScreenResult<NewComplaint> {
        let valid = form.validate()?;
        Ok(NewComplaint {
            description: valid.description,
            person_id: valid.person_id,
            area: valid.area,
        })
    }

    fn validate_update(form: &CaseForm) -> ScreenResult<ComplaintUpdate> {
        let valid = form.validate()?;
        Ok(ComplaintUpdate {
            description: Some(valid.description),
            area: Some(valid.area),
            ..Default::default()
        })
    }

    fn status_update(status: CaseStatus) -> Option<ComplaintUpdate> {
        Some(ComplaintUpdate {
            status: Some(status),
            ..Default::default()
        })
    }
}

impl ScreenResource for Commendations {
    type Form = CaseForm;

    const LOAD_FAILED: &'static str = "Error al cargar las felicitaciones";
    const SAVE_FAILED: &'static str = "Error al guardar la felicitación";
    const DELETE_FAILED: &'static str = "Error al eliminar la felicitación";

    fn record_id(record: &Commendation) -> u64 {
        record.id
    }

    fn matches(record: &Commendation, query_lower: &str) -> bool {
        record.description.to_lowercase().contains(query_lower)
            || record.area.to_lowercase().contains(query_lower)
            || contains_lower(record.person.as_ref().map(|p| p.name.as_str()), query_lower)
    }

    fn form_for(record: &Commendation) -> CaseForm {
        CaseForm::from_parts(&record.description, &record.area, record.person_id)
    }

    fn validate_create(form: &CaseForm) -> ScreenResult<NewCommendation> {
        let valid = form.validate()?;
        Ok(NewCommendation {
            description: valid.description,
            area: valid.area,
            person_id: valid.person_id,
        })
    }

    fn validate_update(form: &CaseForm) -> ScreenResult<CommendationUpdate> {
        let valid = form.validate()?;
        Ok(CommendationUpdate {
            description: Some(valid.description),
            area: Some(valid.area),
        })
    }
}

impl ScreenResource for Requests {
    type Form = CaseForm;

    const LOAD_FAILED: &'static str = "Error al cargar las solicitudes";
    const SAVE_FAILED: &'static str = "Error al guardar la solicitud";
    const DELETE_FAILED: &'static str = "Error al eliminar la solicitud";

    fn record_id(record: &Request) -> u64 {
        record.id
    }

    fn matches(record: &Request, query_lower: &str) -> bool {
        record.description.to_lowercase().contains(query_lower)
            || record.area.to_lowercase().contains(query_lower)
            || contains_lower(record.person.as_ref().map(|p| p.name.as_str()), query_lower)
    }

    fn status(record: &Request) -> Option<CaseStatus> {
        Some(record.status)
    }

    fn form_for(record: &Request) -> CaseForm {
        CaseForm::from_parts(&record.description, &record.area, record.person_id)
    }

    fn validate_create(form: &CaseForm) -> ScreenResult<NewRequest> {
        let valid = form.validate()?;
        Ok(NewRequest {
            description: valid.description,
            person_id: valid.person_id,
            area: valid.area,
        })
    }

    fn validate_update(form: &CaseForm) -> ScreenResult<RequestUpdate> {
        let valid = form.validate()?;
        Ok(RequestUpdate {
            description: Some(valid.description),
            area: Some(valid.area),
            ..Default::default()
        })
    }

    fn status_update(status: CaseStatus) -> Option<RequestUpdate> {
        Some(RequestUpdate {
            status: Some(status),
            ..Default::default()
        })
    }
}

impl ScreenResource for Persons {
    type Form = PersonForm;

    const LOAD_FAILED: &'static str = "Error al cargar las personas";
    const SAVE_FAILED: &'static str = "Error al guardar la persona";
    const DELETE_FAILED: &'static str = "Error al eliminar la persona";

    fn record_id(record: &Person) -> u64 {
        record.id
    }

    fn matches(record: &Person, query_lower: &str) -> bool {
        record.matches_query(query_lower)
    }

    fn form_for(record: &Person) -> PersonForm {
        PersonForm {
            name: record.name.clone(),
            hc_code: record.hc_code.clone(),
            insurance: record.insurance.clone().unwrap_or_default(),
            business: record.business.clone().unwrap_or_default(),
            status: record.status.clone().unwrap_or_default(),
            area: record.area.clone().unwrap_or_default(),
        }
    }

    fn validate_create(form: &PersonForm) -> ScreenResult<PersonInput> {
        form.to_input()
    }

    fn validate_update(form: &PersonForm) -> ScreenResult<PersonInput> {
        form.to_input()
    }
}

// =========================================================================
// Screen
// =========================================================================

/// List/edit screen over one backend collection.
pub struct ResourceScreen<R: ScreenResource, B: ResourceBackend<R>> {
    backend: B,
    items: Vec<R::Record>,
    editing: Option<u64>,
    _resource: PhantomData<R>,
}

impl<R: ScreenResource, B: ResourceBackend<R>> ResourceScreen<R, B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            items: Vec::new(),
            editing: None,
            _resource: PhantomData,
        }
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    /// Replace the list with a fresh fetch. On failure the list is emptied.
    pub fn load(&mut self) -> ScreenResult<()> {
        match self.backend.list() {
            Ok(items) => {
                tracing::debug!(path = R::PATH, count = items.len(), "Screen loaded");
                self.items = items;
                Ok(())
            }
            Err(source) => {
                tracing::error!(path = R::PATH, error = %source, "Failed to load screen");
                self.items.clear();
                Err(ScreenError::Backend {
                    fallback: R::LOAD_FAILED,
                    source,
                })
            }
        }
    }

    /// Records matching the search box and, when given, the status selector.
    pub fn visible(&self, query: &str, status: Option<CaseStatus>) -> Vec<&R::Record> {
        let query = normalize_query(query);
        self.items
            .iter()
            .filter(|record| R::matches(record, &query))
            .filter(|record| status.map_or(true, |wanted| R::status(record) == Some(wanted)))
            .collect()
    }

    /// Open a loaded record for editing and return its prefilled form.
    pub fn start_edit(&mut self, id: u64) -> ScreenResult<R::Form> {
        let record = self
            .items
            .iter()
            .find(|record| R::record_id(record) == id)
            .ok_or(ScreenError::NotFound(id))?;
        self.editing = Some(id);
        Ok(R::form_for(record))
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Create, or update the record being edited, then reload.
    pub fn submit(&mut self, form: &R::Form) -> ScreenResult<()> {
        let result = match self.editing {
            Some(id) => {
                let update = R::validate_update(form)?;
                self.backend.update(id, &update)
            }
            None => {
                let input = R::validate_create(form)?;
                self.backend.create(&input)
            }
        };
        result.map_err(|source| self.mutation_failed(R::SAVE_FAILED, source))?;

        self.editing = None;
        self.load()
    }

    pub fn delete(&mut self, id: u64) -> ScreenResult<()> {
        self.backend
            .delete(id)
            .map_err(|source| self.mutation_failed(R::DELETE_FAILED, source))?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.load()
    }

    /// Move a record to another status from its row selector.
    ///
    /// Resolving needs a resolution note, so it only goes through the
    /// dashboard close flow.
    pub fn change_status(&mut self, id: u64, status: CaseStatus) -> ScreenResult<()> {
        let update = R::status_update(status).ok_or(ScreenError::StatusNotSupported)?;
        if status == CaseStatus::Resolved {
            return Err(ScreenError::Validation(RESOLVE_NEEDS_NOTE.to_string()));
        }
        self.backend
            .update(id, &update)
            .map_err(|source| self.mutation_failed("Error al actualizar el estado", source))?;
        self.load()
    }

    fn mutation_failed(&self, fallback: &'static str, source: BackendError) -> ScreenError {
        tracing::warn!(path = R::PATH, error = %source, "Mutation failed");
        ScreenError::Backend { fallback, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendResult, ErrorPayload};
    use std::sync::Mutex;

    #[derive(Default)]
    struct PersonStore {
        people: Mutex<Vec<Person>>,
        created: Mutex<Vec<serde_json::Value>>,
        reject_create: bool,
    }

    fn person(id: u64, name: &str, hc: &str) -> Person {
        Person {
            id,
            name: name.into(),
            hc_code: hc.into(),
            insurance: Some("Sanitas".into()),
            business: None,
            status: None,
            area: None,
            user_id: None,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    impl ResourceBackend<Persons> for PersonStore {
        fn list(&self) -> BackendResult<Vec<Person>> {
            Ok(self.people.lock().unwrap().clone())
        }

        fn get(&self, id: u64) -> BackendResult<Person> {
            self.people
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(BackendError::Rejected {
                    status: 404,
                    payload: ErrorPayload::Empty,
                })
        }

        fn create(&self, input: &PersonInput) -> BackendResult<()> {
            if self.reject_create {
                return Err(BackendError::Rejected {
                    status: 409,
                    payload: ErrorPayload::Message("hcCode ya registrado".into()),
                });
            }
            self.created.lock().unwrap().push(serde_json::to_value(input).unwrap());
            let mut people = self.people.lock().unwrap();
            let id = people.len() as u64 + 1;
            people.push(person(
                id,
                input.name.as_deref().unwrap_or_default(),
                input.hc_code.as_deref().unwrap_or_default(),
            ));
            Ok(())
        }

        fn update(&self, _id: u64, _input: &PersonInput) -> BackendResult<()> {
            Ok(())
        }

        fn delete(&self, id: u64) -> BackendResult<()> {
            self.people.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct ComplaintLog {
        sent: Mutex<Vec<String>>,
    }

    impl ResourceBackend<Complaints> for ComplaintLog {
        fn list(&self) -> BackendResult<Vec<Complaint>> {
            Ok(Vec::new())
        }

        fn get(&self, id: u64) -> BackendResult<Complaint> {
            Err(BackendError::Rejected {
                status: 404,
                payload: ErrorPayload::Message(format!("Queja {} no encontrada", id)),
            })
        }

        fn create(&self, _input: &NewComplaint) -> BackendResult<()> {
            Ok(())
        }

        fn update(&self, id: u64, input: &ComplaintUpdate) -> BackendResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push(format!("{} {}", id, serde_json::to_string(input).unwrap()));
            Ok(())
        }

        fn delete(&self, _id: u64) -> BackendResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_resolving_from_row_selector_sends_nothing() {
        let store = ComplaintLog::default();
        let mut screen: ResourceScreen<Complaints, _> = ResourceScreen::new(&store);

        let err = screen.change_status(7, CaseStatus::Resolved).unwrap_err();
        assert!(matches!(err, ScreenError::Validation(_)));
        assert_eq!(err.user_message(), RESOLVE_NEEDS_NOTE);
        assert!(store.sent.lock().unwrap().is_empty());

        screen.change_status(7, CaseStatus::InProgress).unwrap();
        assert_eq!(
            *store.sent.lock().unwrap(),
            vec![r#"7 {"estado":"EN_PROCESO"}"#.to_string()]
        );
    }

    #[test]
    fn test_parse_person_id() {
        assert_eq!(parse_person_id(" 12 ").unwrap(), 12);
        assert!(parse_person_id("0").is_err());
        assert!(parse_person_id("-3").is_err());
        assert!(parse_person_id("abc").is_err());
        assert!(parse_person_id("").is_err());
    }

    #[test]
    fn test_case_form_validation_before_request() {
        let form = CaseForm {
            description: "Demora".into(),
            area: "Urgencias".into(),
            person_id: "x1".into(),
        };
        assert!(matches!(
            <Complaints as ScreenResource>::validate_create(&form),
            Err(ScreenError::Validation(_))
        ));

        let blank = CaseForm {
            description: "  ".into(),
            area: "Urgencias".into(),
            person_id: "1".into(),
        };
        assert!(<Requests as ScreenResource>::validate_create(&blank).is_err());
    }

    #[test]
    fn test_person_payload_omits_blank_optionals() {
        let store = PersonStore::default();
        let mut screen: ResourceScreen<Persons, _> = ResourceScreen::new(&store);
        let form = PersonForm {
            name: "Ana Torres".into(),
            hc_code: "HC-1".into(),
            insurance: "  ".into(),
            business: "Acme".into(),
            ..Default::default()
        };
        screen.submit(&form).unwrap();

        let created = store.created.lock().unwrap();
        assert_eq!(
            created[0],
            serde_json::json!({ "nombre": "Ana Torres", "hcCode": "HC-1", "business": "Acme" })
        );
        assert_eq!(screen.items().len(), 1);
    }

    #[test]
    fn test_person_search_and_delete() {
        let store = PersonStore::default();
        store.people.lock().unwrap().extend([
            person(1, "Ana Torres", "HC-1"),
            person(2, "Luis Pardo", "HC-2"),
        ]);
        let mut screen: ResourceScreen<Persons, _> = ResourceScreen::new(&store);
        screen.load().unwrap();

        assert_eq!(screen.visible("hc-2", None).len(), 1);
        assert_eq!(screen.visible("SANITAS", None).len(), 2);

        screen.delete(1).unwrap();
        assert_eq!(screen.items().len(), 1);
        assert!(matches!(
            screen.change_status(2, CaseStatus::Resolved),
            Err(ScreenError::StatusNotSupported)
        ));
    }

    #[test]
    fn test_rejected_save_uses_server_message() {
        let store = PersonStore {
            reject_create: true,
            ..Default::default()
        };
        let mut screen: ResourceScreen<Persons, _> = ResourceScreen::new(&store);
        let err = screen
            .submit(&PersonForm {
                name: "Ana".into(),
                hc_code: "HC-1".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.user_message(), "hcCode ya registrado");
    }

    #[test]
    fn test_edit_prefills_form() {
        let store = PersonStore::default();
        store.people.lock().unwrap().push(person(4, "Eva", "HC-4"));
        let mut screen: ResourceScreen<Persons, _> = ResourceScreen::new(&store);
        screen.load().unwrap();

        let form = screen.start_edit(4).unwrap();
        assert_eq!(form.insurance, "Sanitas");
        assert_eq!(screen.editing(), Some(4));
        assert!(matches!(screen.start_edit(99), Err(ScreenError::NotFound(99))));
    }
}
