//! The batch-dispatch and result-policy engine shared by every batched
//! Manager operation.
//!
//! The five batched operations (`resolve`, `preflight`, `register`,
//! `entityExists`, `defaultEntityReference`, `entityTraits`,
//! `getWithRelationship(s)`) all reduce to one pattern: collect whatever a
//! callback-style interface method reports for each input index into a
//! single `Vec<Result<T, BatchElementError>>`, then project that vector into
//! whichever of the four public shapes the caller asked for.

use crate::access::AccessName;
use crate::utils::error::BatchElementException;

/// The per-element failure code drawn from the closed set the contract defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchElementErrorCode {
    Unknown,
    InvalidEntityReference,
    MalformedEntityReference,
    EntityAccessError,
    EntityResolutionError,
    InvalidPreflightHint,
    InvalidTraitSet,
}

impl BatchElementErrorCode {
    /// The name used as the leading segment of a rendered
    /// [`BatchElementException`] message.
    pub fn name(&self) -> &'static str {
        match self {
            BatchElementErrorCode::Unknown => "unknown",
            BatchElementErrorCode::InvalidEntityReference => "invalidEntityReference",
            BatchElementErrorCode::MalformedEntityReference => "malformedEntityReference",
            BatchElementErrorCode::EntityAccessError => "entityAccessError",
            BatchElementErrorCode::EntityResolutionError => "entityResolutionError",
            BatchElementErrorCode::InvalidPreflightHint => "invalidPreflightHint",
            BatchElementErrorCode::InvalidTraitSet => "invalidTraitSet",
        }
    }
}

/// `{code, message}` describing a single element's failure within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchElementError {
    pub code: BatchElementErrorCode,
    pub message: String,
}

impl BatchElementError {
    pub fn new(code: BatchElementErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Renders this error as a [`BatchElementException`] for the given
    /// index, access mode, and entity reference.
    pub fn into_exception(
        self,
        index: usize,
        access: Option<AccessName>,
        entity: Option<String>,
    ) -> BatchElementException {
        BatchElementException::new(index, self.code, self.message, access, entity)
    }
}

/// Selects between throwing and sum-typed batch result shapes.
///
/// `Default` behaves identically to `KException`: both throw on the first
/// element-level error. They are kept as distinct variants because callers
/// may want to be explicit about which they intended at a call site, matching
/// the source contract's three named policies (default / `kException` /
/// `kVariant`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchElementErrorPolicyTag {
    #[default]
    Default,
    KException,
    KVariant,
}

/// One element of a `kVariant`-policy result: either the operation's success
/// value or the per-element failure.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchElement<T> {
    Success(T),
    Error(BatchElementError),
}

impl<T> BatchElement<T> {
    pub fn success(self) -> Option<T> {
        match self {
            BatchElement::Success(value) => Some(value),
            BatchElement::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BatchElement::Error(_))
    }
}

/// The `onSuccess`/`onError` callback pair appended to every batched
/// `ManagerInterface` method.
///
/// A plain struct of two boxed closures rather than a trait keeps call sites
/// ergonomic (`BatchCallbacks::new(|i, v| ..., |i, e| ...)`) while still
/// letting the interface invoke them zero, some, or all of the times, in any
/// order relative to input index — see the ordering guarantees in the
/// concurrency model.
pub struct BatchCallbacks<'a, T> {
    on_success: Box<dyn FnMut(usize, T) + 'a>,
    on_error: Box<dyn FnMut(usize, BatchElementError) + 'a>,
}

impl<'a, T> BatchCallbacks<'a, T> {
    pub fn new(
        on_success: impl FnMut(usize, T) + 'a,
        on_error: impl FnMut(usize, BatchElementError) + 'a,
    ) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
        }
    }

    pub fn success(&mut self, index: usize, value: T) {
        (self.on_success)(index, value)
    }

    pub fn error(&mut self, index: usize, error: BatchElementError) {
        (self.on_error)(index, error)
    }
}

/// Accumulates callback-delivered results for `len` inputs into index order,
/// regardless of the order the interface invokes the callbacks in, while
/// separately remembering which index was the *first* to be reported as an
/// error — i.e. the first `onError` call observed in time, not the lowest
/// index among any errors eventually collected.
///
/// This is the one piece of internal state the rest of the batch engine is
/// built on: every batched Manager method constructs one, hands a
/// [`BatchCallbacks`] wired to its `record_success`/`record_error` methods to
/// the interface, and then projects `into_outcome` into whichever public
/// shape the caller's policy selected.
pub struct BatchCollector<T> {
    slots: Vec<Option<Result<T, BatchElementError>>>,
    first_error_index: Option<usize>,
}

impl<T> BatchCollector<T> {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            first_error_index: None,
        }
    }

    pub fn record_success(&mut self, index: usize, value: T) {
        self.slots[index] = Some(Ok(value));
    }

    pub fn record_error(&mut self, index: usize, error: BatchElementError) {
        if self.first_error_index.is_none() {
            self.first_error_index = Some(index);
        }
        self.slots[index] = Some(Err(error));
    }

    /// Consumes the collector, returning one `Result` per input index plus
    /// the index of the first error observed in callback-arrival order.
    ///
    /// Indices for which the interface never invoked a callback are absent
    /// from its own promise but the core never blocks waiting for them:
    /// they are represented as [`BatchElementErrorCode::Unknown`] so that
    /// every projection below always yields exactly `len` elements. Such
    /// synthesized errors never set `first_error_index` themselves, since no
    /// callback ever actually arrived for them.
    pub fn into_outcome(self) -> BatchOutcome<T> {
        let first_error_index = self.first_error_index;
        let results = self
            .slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(BatchElementError::new(
                        BatchElementErrorCode::Unknown,
                        "manager implementation did not report a result for this input",
                    ))
                })
            })
            .collect();
        BatchOutcome {
            results,
            first_error_index,
        }
    }
}

/// The fully-populated result of one batch dispatch: every input's
/// `Result<T, BatchElementError>` in input-index order, plus (if any error
/// was reported) the index of the one reported *first*, in callback-arrival
/// order.
pub struct BatchOutcome<T> {
    pub results: Vec<Result<T, BatchElementError>>,
    pub first_error_index: Option<usize>,
}

/// Runs a single callback-style interface call against a fresh
/// [`BatchCollector`] of `len` slots, returning the fully-populated outcome.
///
/// This is the one seam every batched Manager method funnels through: build
/// the interface call as a closure taking the [`BatchCallbacks`] it should
/// hand to the interface, and `run_batch` takes care of wiring those
/// callbacks to index-ordered storage while also tracking arrival order for
/// the throwing projection below.
pub fn run_batch<T>(
    len: usize,
    call: impl FnOnce(&mut BatchCallbacks<'_, T>) -> crate::utils::error::ManagerInterfaceResult<()>,
) -> crate::utils::error::ManagerInterfaceResult<BatchOutcome<T>> {
    let collector = std::cell::RefCell::new(BatchCollector::new(len));
    {
        let mut callbacks = BatchCallbacks::new(
            |index, value| collector.borrow_mut().record_success(index, value),
            |index, error| collector.borrow_mut().record_error(index, error),
        );
        call(&mut callbacks)?;
    }
    Ok(collector.into_inner().into_outcome())
}

/// Projects a fully-populated results vector into the batch-variant shape:
/// never throws, embeds each per-element error in place.
pub fn project_variant<T>(results: Vec<Result<T, BatchElementError>>) -> Vec<BatchElement<T>> {
    results
        .into_iter()
        .map(|result| match result {
            Ok(value) => BatchElement::Success(value),
            Err(error) => BatchElement::Error(error),
        })
        .collect()
}

/// Projects a fully-populated batch outcome into the batch-throwing shape:
/// throws the [`BatchElementException`] for whichever index was the first to
/// be reported as an error *in callback-arrival order* — not necessarily the
/// lowest input index among the errors present — discarding every other
/// result, including successes recorded after it. Indices the interface
/// never reported on at all (and which therefore have no arrival order to
/// speak of) are only raised if no real callback-observed error exists,
/// falling back to the lowest such index.
pub fn project_throwing<T>(
    outcome: BatchOutcome<T>,
    access: Option<AccessName>,
    entities: &[String],
) -> Result<Vec<T>, BatchElementException> {
    let BatchOutcome {
        mut results,
        first_error_index,
    } = outcome;

    let error_index = first_error_index.or_else(|| {
        results
            .iter()
            .position(|result| result.is_err())
    });

    if let Some(index) = error_index {
        let error = match results.swap_remove(index) {
            Err(error) => error,
            Ok(_) => unreachable!("error_index always names a slot holding an Err"),
        };
        let entity = entities.get(index).cloned();
        return Err(error.into_exception(index, access, entity));
    }

    Ok(results
        .into_iter()
        .map(|result| result.expect("no error present in outcome with no error_index"))
        .collect())
}

/// Projects the sole element of a singular call under the throwing policy.
pub fn project_singular_throwing<T>(
    outcome: BatchOutcome<T>,
    access: Option<AccessName>,
    entity: Option<String>,
) -> Result<T, BatchElementException> {
    debug_assert_eq!(outcome.results.len(), 1);
    let mut results = outcome.results;
    match results.remove(0) {
        Ok(value) => Ok(value),
        Err(error) => Err(error.into_exception(0, access, entity)),
    }
}

/// Projects the sole element of a singular call under the variant policy.
pub fn project_singular_variant<T>(outcome: BatchOutcome<T>) -> BatchElement<T> {
    debug_assert_eq!(outcome.results.len(), 1);
    let mut results = outcome.results;
    match results.remove(0) {
        Ok(value) => BatchElement::Success(value),
        Err(error) => BatchElement::Error(error),
    }
}
