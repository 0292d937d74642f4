//! Resource descriptors tying record types to their backend collections.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::case::{
    CaseKind, Commendation, CommendationUpdate, Complaint, ComplaintUpdate, NewCommendation,
    NewComplaint, NewRequest, Request, RequestUpdate,
};
use super::person::{Person, PersonInput};

/// A CRUD collection exposed by the backend.
pub trait Resource: Send + Sync + 'static {
    type Record: DeserializeOwned + Clone + Send;
    type Create: Serialize + Sync;
    type Update: Serialize + Sync;

    /// Collection path relative to the API base URL.
    const PATH: &'static str;
}

/// Case collections with a finalize helper (`PUT <path>/{id}/finalizar`).
pub trait Finalizable: Resource {
    const KIND: CaseKind;
}

pub struct Complaints;
pub struct Commendations;
pub struct Requests;
pub struct Persons;

impl Resource for Complaints {
    type Record = Complaint;
    type Create = NewComplaint;
    type Update = ComplaintUpdate;
    const PATH: &'static str = "/quejas";
}

impl Resource for Commendations {
    type Record = Commendation;
    type Create = NewCommendation;
    type Update = CommendationUpdate;
    const PATH: &'static str = "/felicitacion";
}

impl Resource for Requests {
    type Record = Request;
    type Create = NewRequest;
    type Update = RequestUpdate;
    const PATH: &'static str = "/solicitud";
}

impl Resource for Persons {
    type Record = Person;
    type Create = PersonInput;
    type Update = PersonInput;
    const PATH: &'static str = "/persona";
}

impl Finalizable for Complaints {
    const KIND: CaseKind = CaseKind::Complaint;
}

impl Finalizable for Commendations {
    const KIND: CaseKind = CaseKind::Commendation;
}

impl Finalizable for Requests {
    const KIND: CaseKind = CaseKind::Request;
}
