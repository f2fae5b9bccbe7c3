//! acr-push Docker image build functionality
//!
//! This crate drives the `docker` CLI to build an image from a Dockerfile,
//! tag it, and push it to a container registry. It also provides the
//! helpers the interactive wizard needs: Dockerfile discovery and tag
//! suggestions.

pub mod docker;
pub mod error;
pub mod plan;
pub mod progress;
pub mod publish;
pub mod resolver;
pub mod version;

pub use docker::{BuildRequest, DockerCli};
pub use error::{BuildError, BuildResult};
pub use plan::{BuildPlan, validate_repository, validate_tag};
pub use progress::StepProgress;
pub use publish::publish;
pub use resolver::{find_dockerfiles, validate_docker_paths};
pub use version::{max_semver, suggest_tags};
