//! Squirrel use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for the HTTP dispatcher.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::squirrel::{NewSquirrel, Squirrel, SquirrelId};
use crate::repo::squirrel_repo::{RepoResult, SquirrelRepository};
use log::debug;

/// Use-case service wrapper for squirrel CRUD operations.
pub struct SquirrelService<R: SquirrelRepository> {
    repo: R,
}

impl<R: SquirrelRepository> SquirrelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every live squirrel in id order.
    pub fn list_squirrels(&self) -> RepoResult<Vec<Squirrel>> {
        self.repo.list_squirrels()
    }

    /// Gets one squirrel, `None` when it was never created or has been deleted.
    pub fn get_squirrel(&self, id: SquirrelId) -> RepoResult<Option<Squirrel>> {
        self.repo.get_squirrel(id)
    }

    /// Creates a squirrel and returns the stored record.
    pub fn create_squirrel(&self, input: &NewSquirrel) -> RepoResult<Squirrel> {
        let created = self.repo.create_squirrel(input)?;
        debug!(
            "event=squirrel_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces name and size of an existing squirrel.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn update_squirrel(&self, id: SquirrelId, input: &NewSquirrel) -> RepoResult<()> {
        self.repo.update_squirrel(id, input)?;
        debug!("event=squirrel_update module=service status=ok id={id}");
        Ok(())
    }

    /// Hard-deletes a squirrel.
    pub fn delete_squirrel(&self, id: SquirrelId) -> RepoResult<()> {
        self.repo.delete_squirrel(id)?;
        debug!("event=squirrel_delete module=service status=ok id={id}");
        Ok(())
    }
}
