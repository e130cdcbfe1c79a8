use crate::{
    model,
    record::Id,
    Json, Model, Params, Result, SharedConnection,
};

use std::{fmt, marker::PhantomData};

/// A reusable query scope: one endpoint, seen through one connection, under
/// default filters.
pub struct Proxy<M> {
    connection: SharedConnection,
    endpoint: String,
    default_params: Params,
    _p: PhantomData<fn() -> M>,
}

impl<M: Model> Proxy<M> {
    /// A scope over the model's own endpoint.
    pub fn new(connection: SharedConnection, default_params: Params) -> Self {
        Self::scoped_to(connection, M::names().endpoint.clone(), default_params)
    }

    pub fn scoped_to(
        connection: SharedConnection,
        endpoint: impl Into<String>,
        default_params: Params,
    ) -> Self {
        Self {
            connection,
            endpoint: endpoint.into(),
            default_params,
            _p: PhantomData,
        }
    }

    pub fn connection(&self) -> &SharedConnection {
        &self.connection
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_params(&self) -> &Params {
        &self.default_params
    }

    /// Default params overlaid with `extra`; `extra` wins on collision.
    pub fn params(&self, extra: Params) -> Params {
        let mut params = self.default_params.clone();
        params.extend(extra);
        params
    }

    /// Lists the scope's resources.
    pub async fn all(&self, extra: Params) -> Result<Vec<M>> {
        model::list(&self.connection, &self.endpoint, self.params(extra)).await
    }

    /// The first listed resource, fetched with `limit = 1`.
    pub async fn first(&self, mut extra: Params) -> Result<Option<M>> {
        extra.insert("limit".to_string(), Json::from(1));
        Ok(self.all(extra).await?.into_iter().next())
    }

    /// Fetches one resource by id. Default params do not apply.
    pub async fn find(&self, id: Id, params: Params) -> Result<M> {
        model::get(&self.connection, &self.endpoint, id, params).await
    }
}

impl<M> Clone for Proxy<M> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            endpoint: self.endpoint.clone(),
            default_params: self.default_params.clone(),
            _p: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Proxy<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("endpoint", &self.endpoint)
            .field("default_params", &self.default_params)
            .finish()
    }
}
