//! A paged cursor over entity references returned by a relationship query.

use std::sync::Arc;

use crate::context::HostSession;
use crate::entity_reference::EntityReference;
use crate::manager_interface::EntityReferencePagerInterface;
use crate::utils::error::ManagerInterfaceResult;

/// Wraps an [`EntityReferencePagerInterface`], forwarding `has_next`, `get`,
/// and `next` with the owning [`HostSession`] injected.
///
/// Holds a strong (`Arc`) reference to the underlying interface rather than
/// borrowing it, so that an interface instantiated by a foreign plug-in
/// runtime and immediately released by its caller stays alive for as long as
/// any `EntityReferencePager` handle pointing at it remains reachable. This
/// is the ownership invariant called out in the design notes: letting it
/// lapse reproduces a "pure virtual called" failure the moment the last page
/// is requested.
#[derive(Clone)]
pub struct EntityReferencePager {
    interface: Arc<dyn EntityReferencePagerInterface>,
    host_session: Arc<HostSession>,
}

impl EntityReferencePager {
    pub fn new(
        interface: Arc<dyn EntityReferencePagerInterface>,
        host_session: Arc<HostSession>,
    ) -> Self {
        Self {
            interface,
            host_session,
        }
    }

    /// Whether a subsequent call to `next` would advance to another page.
    pub fn has_next(&self) -> ManagerInterfaceResult<bool> {
        self.interface.has_next(&self.host_session)
    }

    /// The entity references on the current page.
    pub fn get(&self) -> ManagerInterfaceResult<Vec<EntityReference>> {
        self.interface.get(&self.host_session)
    }

    /// Advances to the next page.
    pub fn next(&self) -> ManagerInterfaceResult<()> {
        self.interface.next(&self.host_session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HostInterface;
    use crate::log::{Logger, NullLogger};
    use std::sync::Mutex;

    struct StubHost;
    impl HostInterface for StubHost {
        fn identifier(&self) -> String {
            "stub".into()
        }
        fn display_name(&self) -> String {
            "Stub Host".into()
        }
    }

    struct TwoPageInterface {
        page: Mutex<usize>,
    }

    impl EntityReferencePagerInterface for TwoPageInterface {
        fn has_next(&self, _host_session: &HostSession) -> ManagerInterfaceResult<bool> {
            Ok(*self.page.lock().unwrap() == 0)
        }

        fn get(&self, _host_session: &HostSession) -> ManagerInterfaceResult<Vec<EntityReference>> {
            let page = *self.page.lock().unwrap();
            Ok(vec![EntityReference::new_unchecked(format!(
                "asset://page{page}"
            ))])
        }

        fn next(&self, _host_session: &HostSession) -> ManagerInterfaceResult<()> {
            *self.page.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn host_session() -> Arc<HostSession> {
        Arc::new(HostSession::new(
            Arc::new(StubHost),
            Arc::new(NullLogger) as Arc<dyn Logger>,
        ))
    }

    #[test]
    fn pager_survives_the_caller_dropping_its_own_reference_to_the_interface() {
        let interface: Arc<dyn EntityReferencePagerInterface> =
            Arc::new(TwoPageInterface { page: Mutex::new(0) });
        let pager = EntityReferencePager::new(Arc::clone(&interface), host_session());
        drop(interface);

        assert!(pager.has_next().unwrap());
        assert_eq!(
            pager.get().unwrap(),
            vec![EntityReference::new_unchecked("asset://page0")]
        );
        pager.next().unwrap();
        assert!(!pager.has_next().unwrap());
    }
}
