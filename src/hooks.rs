use crate::request::PendingRequest;
use crate::response::Response;
use parking_lot::RwLock;
use std::sync::Arc;

/// Callback run on every request before its first dispatch
pub type PreRequestHook = Arc<dyn Fn(&mut PendingRequest) + Send + Sync>;

/// Callback run on the final response of every request
pub type PostResponseHook = Arc<dyn Fn(&Response) + Send + Sync>;

/// Ordered pre/post request callbacks of a session.
///
/// Hooks are independent of authentication: pre hooks see each logical
/// request once, post hooks never see a response that was discarded to
/// re-authenticate.
#[derive(Default)]
pub struct Hooks {
    pre: RwLock<Vec<PreRequestHook>>,
    post: RwLock<Vec<PostResponseHook>>,
}

impl Hooks {
    pub fn register_pre(&self, hook: PreRequestHook) {
        self.pre.write().push(hook);
    }

    pub fn register_post(&self, hook: PostResponseHook) {
        self.post.write().push(hook);
    }

    pub fn run_pre(&self, request: &mut PendingRequest) {
        // Snapshot so a hook may register further hooks without deadlocking.
        let hooks = self.pre.read().clone();
        for hook in &hooks {
            hook(request);
        }
    }

    pub fn run_post(&self, response: &Response) {
        let hooks = self.post.read().clone();
        for hook in &hooks {
            hook(response);
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("pre", &self.pre.read().len())
            .field("post", &self.post.read().len())
            .finish()
    }
}
