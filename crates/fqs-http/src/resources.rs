//! CRUD wrappers for the backend collections.

use std::marker::PhantomData;

use reqwest::Method;

use fqs_core::backend::{BackendResult, CaseBackend, RatingBackend, ResourceBackend};
use fqs_core::models::{
    Commendation, Complaint, ComplaintUpdate, Complaints, Commendations, FinalizeCase, Finalizable,
    RatingForm, Request, RequestUpdate, Requests, Resource,
};

use crate::client::{Access, ApiClient};

/// Ratings collection path.
pub const RATINGS_PATH: &str = "/formulario";

/// Typed view of one collection.
pub struct ResourceApi<'a, R: Resource> {
    client: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl ApiClient {
    pub fn resource<R: Resource>(&self) -> ResourceApi<'_, R> {
        ResourceApi {
            client: self,
            _resource: PhantomData,
        }
    }
}

impl<'a, R: Resource> ResourceApi<'a, R> {
    fn item_path(id: u64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    pub fn list(&self) -> BackendResult<Vec<R::Record>> {
        self.client.get(R::PATH, Access::Authenticated)
    }

    pub fn get(&self, id: u64) -> BackendResult<R::Record> {
        self.client.get(&Self::item_path(id), Access::Authenticated)
    }

    pub fn create(&self, input: &R::Create) -> BackendResult<()> {
        self.client
            .send_json(Method::POST, R::PATH, input, Access::Authenticated)?;
        tracing::info!(path = R::PATH, "Record created");
        Ok(())
    }

    pub fn update(&self, id: u64, input: &R::Update) -> BackendResult<()> {
        self.client
            .send_json(Method::PUT, &Self::item_path(id), input, Access::Authenticated)?;
        tracing::info!(path = R::PATH, id, "Record updated");
        Ok(())
    }

    pub fn delete(&self, id: u64) -> BackendResult<()> {
        self.client.delete(&Self::item_path(id))?;
        tracing::info!(path = R::PATH, id, "Record deleted");
        Ok(())
    }
}

impl<'a, R: Finalizable> ResourceApi<'a, R> {
    /// Append `text` to the record's resolution and mark it resolved.
    pub fn finalize(&self, id: u64, text: &str) -> BackendResult<()> {
        let path = format!("{}/{}/finalizar", R::PATH, id);
        let body = FinalizeCase {
            text: text.to_string(),
        };
        self.client
            .send_json(Method::PUT, &path, &body, Access::Authenticated)?;
        tracing::info!(kind = %R::KIND, id, "Case finalized");
        Ok(())
    }
}

impl<R: Resource> ResourceBackend<R> for ApiClient {
    fn list(&self) -> BackendResult<Vec<R::Record>> {
        self.resource::<R>().list()
    }

    fn get(&self, id: u64) -> BackendResult<R::Record> {
        self.resource::<R>().get(id)
    }

    fn create(&self, input: &R::Create) -> BackendResult<()> {
        self.resource::<R>().create(input)
    }

    fn update(&self, id: u64, input: &R::Update) -> BackendResult<()> {
        self.resource::<R>().update(id, input)
    }

    fn delete(&self, id: u64) -> BackendResult<()> {
        self.resource::<R>().delete(id)
    }
}

impl CaseBackend for ApiClient {
    fn list_complaints(&self) -> BackendResult<Vec<Complaint>> {
        self.resource::<Complaints>().list()
    }

    fn list_commendations(&self) -> BackendResult<Vec<Commendation>> {
        self.resource::<Commendations>().list()
    }

    fn list_requests(&self) -> BackendResult<Vec<Request>> {
        self.resource::<Requests>().list()
    }

    fn finalize_complaint(&self, id: u64, text: &str) -> BackendResult<()> {
        self.resource::<Complaints>().finalize(id, text)
    }

    fn update_complaint(&self, id: u64, update: &ComplaintUpdate) -> BackendResult<()> {
        self.resource::<Complaints>().update(id, update)
    }

    fn finalize_request(&self, id: u64, text: &str) -> BackendResult<()> {
        self.resource::<Requests>().finalize(id, text)
    }

    fn update_request(&self, id: u64, update: &RequestUpdate) -> BackendResult<()> {
        self.resource::<Requests>().update(id, update)
    }
}

impl RatingBackend for ApiClient {
    fn list_ratings(&self) -> BackendResult<Vec<RatingForm>> {
        self.get(RATINGS_PATH, Access::Authenticated)
    }
}
