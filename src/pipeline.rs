// Sequence-to-viewer pipeline: request, extract, render. Strictly linear and
// all-or-nothing; the renderer only runs once a structure has been extracted.

use crate::api::{FoldClient, FoldRequest, Transport};
use crate::config::Settings;
use crate::error::Result;
use crate::ui::with_spinner;
use crate::viewer::{Artifact, OutputMode, Renderer};
use tracing::info;

pub struct Pipeline<T: Transport, R: Renderer> {
    client: FoldClient<T>,
    renderer: R,
    request: FoldRequest,
    output: OutputMode,
}

impl<T: Transport, R: Renderer> Pipeline<T, R> {
    pub fn new(settings: Settings, transport: T, renderer: R) -> Self {
        let Settings {
            credential,
            endpoint,
            sequence,
            output,
            ..
        } = settings;
        Pipeline {
            client: FoldClient::new(transport, endpoint, credential),
            renderer,
            request: FoldRequest::new(sequence),
            output,
        }
    }

    pub fn run(&self) -> Result<Artifact> {
        let response = with_spinner("Predicting structure...", || {
            self.client.predict(&self.request)
        })?;
        let structure = response.first_structure()?;
        info!(bytes = structure.len(), "extracted structure payload");

        let artifact = self.renderer.emit(structure, &self.output)?;
        info!(path = %artifact.path.display(), opened = artifact.opened, "viewer ready");
        Ok(artifact)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
