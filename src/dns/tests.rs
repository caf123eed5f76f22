use super::resolver::{LookupFailure, LookupMailHosts};
use super::types::MxRecord;

type MxFn = dyn Fn(&str) -> Result<Vec<MxRecord>, LookupFailure>;
type AddrFn = dyn Fn(&str) -> bool;

pub(crate) struct StubResolver {
    on_mx: Box<MxFn>,
    on_addr: Box<AddrFn>,
}

impl StubResolver {
    pub(crate) fn new<M, A>(on_mx: M, on_addr: A) -> Self
    where
        M: Fn(&str) -> Result<Vec<MxRecord>, LookupFailure> + 'static,
        A: Fn(&str) -> bool + 'static,
    {
        Self {
            on_mx: Box::new(on_mx),
            on_addr: Box::new(on_addr),
        }
    }

    /// Stub with MX answers only; the address fallback never fires.
    pub(crate) fn mx<M>(on_mx: M) -> Self
    where
        M: Fn(&str) -> Result<Vec<MxRecord>, LookupFailure> + 'static,
    {
        Self::new(on_mx, |_| false)
    }
}

impl LookupMailHosts for StubResolver {
    fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, LookupFailure> {
        (self.on_mx)(domain)
    }

    fn has_address_records(&self, domain: &str) -> bool {
        (self.on_addr)(domain)
    }
}
