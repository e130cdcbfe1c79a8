use crate::{
    err,
    record::{is_present, Id, Record},
    Error, Json, Method, Names, Params, Proxy, RequestOptions, Result, SharedConnection,
};

use async_trait::async_trait;
use log::{debug, warn};

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{OnceLock, PoisonError, RwLock},
};

/// A resource type exposed by the REST API.
///
/// Implementors wrap a [`Record`] and describe how the resource is named and
/// decoded. CRUD operations come from the blanket [`Persist`] impl.
pub trait Model: Sized + Send + Sync + 'static {
    /// Simple type name the endpoint and JSON members are derived from.
    const NAME: &'static str;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Derives the endpoint and JSON member names. Override when the API
    /// does not follow the pluralized type name.
    fn derive_names() -> Names {
        Names::from_type_name(Self::NAME)
    }

    /// Names of this type, computed once.
    fn names() -> &'static Names {
        names::<Self>()
    }

    /// Replaces the attributes with the ones decoded from `source`. Types
    /// post-processing nested members call [`Record::assign`] first.
    fn decode(&mut self, source: Option<&Json>) {
        self.record_mut().assign(source);
    }

    /// Filters every listing through [`Model::scope`] carries.
    fn default_params() -> Params {
        Params::new()
    }

    /// All records of this type visible through `connection`, under the
    /// type's default filters.
    fn scope(connection: &SharedConnection) -> Proxy<Self> {
        Proxy::new(connection.clone(), Self::default_params())
    }

    /// Materializes an instance from a payload, with no pending changes.
    fn load(connection: SharedConnection, source: Option<&Json>) -> Self {
        let mut model = Self::from_record(Record::blank(connection));
        model.decode(source);
        model.record_mut().clear_changes();
        model
    }

    /// A new, unsaved instance.
    fn build(connection: &SharedConnection) -> Self {
        Self::load(connection.clone(), None)
    }

    fn id(&self) -> Option<Id> {
        self.record().id()
    }

    fn get(&self, name: &str) -> Option<&Json> {
        self.record().get(name)
    }

    fn set(&mut self, name: impl Into<String>, value: impl Into<Json>) {
        self.record_mut().set(name, value);
    }

    fn changes(&self) -> Params {
        self.record().changes()
    }

    fn attributes(&self) -> &Params {
        self.record().attributes()
    }

    fn errors(&self) -> Option<&Json> {
        self.record().errors()
    }
}

fn names<M: Model>() -> &'static Names {
    static NAMES: OnceLock<RwLock<HashMap<TypeId, &'static Names>>> = OnceLock::new();

    let names = NAMES.get_or_init(Default::default);
    let key = TypeId::of::<M>();

    if let Some(found) = names
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return *found;
    }

    *names
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert_with(|| Box::leak(Box::new(M::derive_names())))
}

/// Create, read, update and delete against the REST API.
///
/// Validation failures of `create`, `update` and the class-level calls are
/// treated differently: with an instance at hand they are captured into its
/// errors and reported through the `bool` result; without one they are
/// returned as `Err`. `destroy` also captures other request failures.
#[async_trait]
pub trait Persist: Model {
    /// `GET api/{endpoint}/{id}`.
    async fn find(connection: &SharedConnection, id: Id, params: Params) -> Result<Self> {
        get(connection, &Self::names().endpoint, id, params).await
    }

    /// `GET api/{endpoint}`, one instance per listed resource in response
    /// order.
    async fn all(connection: &SharedConnection, params: Params) -> Result<Vec<Self>> {
        list(connection, &Self::names().endpoint, params).await
    }

    /// `POST api/{endpoint}/new` with `params` as body.
    async fn create_with(connection: &SharedConnection, params: Params) -> Result<Self> {
        let path = format!("api/{}/new", Self::names().endpoint);
        let json = send(connection, Method::Post, &path, RequestOptions::with_body(params))
            .await?;
        let item = item_member::<Self>(&json)?;
        Ok(Self::load(connection.clone(), Some(item)))
    }

    /// Creates the resource when it has no id yet, updates it otherwise.
    async fn save(&mut self, force: bool) -> Result<bool> {
        match self.id() {
            Some(_) => self.update(force).await,
            None => self.create().await,
        }
    }

    /// `POST api/{endpoint}/new` with every attribute as body.
    async fn create(&mut self) -> Result<bool> {
        let path = format!("api/{}/new", Self::names().endpoint);
        let body = self.attributes().clone();
        mutate(self, Method::Post, &path, body).await
    }

    /// Sends the changed attributes with `PATCH`, or `PUT` when `force` is
    /// set. Returns `false` without a request when nothing changed.
    ///
    /// Changed attributes without a present value are left out of the
    /// payload, so a field cannot be cleared this way.
    async fn update(&mut self, force: bool) -> Result<bool> {
        if !self.record().has_changes() {
            return Ok(false);
        }

        let id = self.id().ok_or_else(|| {
            err!("cannot update {} without an id", Self::NAME)
        })?;
        let path = format!("api/{}/{}/edit", Self::names().endpoint, id);
        let method = if force { Method::Put } else { Method::Patch };
        let body = self
            .changes()
            .into_iter()
            .filter(|(_, value)| is_present(value))
            .collect();

        mutate(self, method, &path, body).await
    }

    /// `DELETE api/{endpoint}/{id}/delete`. A failed request is captured
    /// into the errors and reported as `false`.
    async fn destroy(&mut self) -> Result<bool> {
        let id = self.id().ok_or_else(|| {
            err!("cannot destroy {} without an id", Self::NAME)
        })?;
        let path = format!("api/{}/{}/delete", Self::names().endpoint, id);
        let connection = self.record().connection().clone();

        match send(&connection, Method::Delete, &path, RequestOptions::new()).await {
            Ok(_) => {
                self.record_mut().set_errors(None);
                Ok(true)
            }
            Err(err) if err.is_request() => {
                warn!("{} {}: {}", Method::Delete, path, err);
                self.record_mut().set_errors(Some(captured(&err)));
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

impl<M: Model> Persist for M {}

/// Sends a create or update request and rehydrates `model` from the
/// response. Validation failures are captured into its errors.
async fn mutate<M: Model>(model: &mut M, method: Method, path: &str, body: Params) -> Result<bool> {
    let connection = model.record().connection().clone();

    match send(&connection, method, path, RequestOptions::with_body(body)).await {
        Ok(json) => {
            let item = item_member::<M>(&json)?;
            model.decode(Some(item));
            model.record_mut().clear_changes();
            model.record_mut().set_errors(None);
        }
        Err(err) if err.is_validation() => {
            warn!("{} {}: {}", method, path, err);
            model.record_mut().set_errors(Some(captured(&err)));
        }
        Err(err) => return Err(err),
    }

    Ok(model.record().is_valid())
}

/// Fetches `api/{endpoint}/{id}` and decodes the item member.
pub(crate) async fn get<M: Model>(
    connection: &SharedConnection,
    endpoint: &str,
    id: Id,
    params: Params,
) -> Result<M> {
    let path = format!("api/{}/{}", endpoint, id);
    let json = send(connection, Method::Get, &path, RequestOptions::with_params(params)).await?;
    let item = item_member::<M>(&json)?;
    Ok(M::load(connection.clone(), Some(item)))
}

/// Lists `api/{endpoint}` and decodes each resource of the collection
/// member.
pub(crate) async fn list<M: Model>(
    connection: &SharedConnection,
    endpoint: &str,
    params: Params,
) -> Result<Vec<M>> {
    let path = format!("api/{}", endpoint);
    let json = send(connection, Method::Get, &path, RequestOptions::with_params(params)).await?;
    let field_name = &M::names().field_name;

    match json.get(field_name) {
        Some(Json::Object(items)) => Ok(items
            .values()
            .map(|item| M::load(connection.clone(), Some(item)))
            .collect()),
        // Empty listings are serialized as `[]`.
        Some(Json::Array(items)) => Ok(items
            .iter()
            .map(|item| M::load(connection.clone(), Some(item)))
            .collect()),
        _ => Err(Error::invalid_response(format!(
            "missing `{}` collection in response to GET {}",
            field_name, path
        ))),
    }
}

pub(crate) async fn send(
    connection: &SharedConnection,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<Json> {
    debug!("{} {}", method, path);
    connection.request(method, path, options).await
}

fn item_member<M: Model>(json: &Json) -> Result<&Json> {
    let item_name = &M::names().item_name;
    match json.get(item_name) {
        Some(item @ Json::Object(_)) => Ok(item),
        _ => Err(Error::invalid_response(format!(
            "missing `{}` member",
            item_name
        ))),
    }
}

/// Error details to keep on an instance after a failed request.
fn captured(err: &Error) -> Json {
    match err.errors() {
        Some(errors) => errors.clone(),
        None => serde_json::json!([{
            "code": err.status(),
            "message": err.to_string(),
        }]),
    }
}
