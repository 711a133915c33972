//! Price timeline resolution
//!
//! A product's prices form a timeline of inclusive date intervals that never
//! overlap. [`resolve`] reconciles a proposed interval against that timeline and
//! returns the exact set of removals and insertions that keep it consistent.
//! It is a pure function: persistence and history logging happen in the store.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// One priced interval of a product timeline.
///
/// `end_date == None` means the price is valid indefinitely after `start_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceInterval {
    /// Store identity, `None` for intervals not persisted yet
    pub id: Option<i32>,
    pub product_id: i32,
    pub price: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl PriceInterval {
    pub fn new(
        product_id: i32,
        price: Decimal,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: None,
            product_id,
            price,
            start_date,
            end_date,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// `start_date <= end_date`, always true for open intervals
    pub fn is_well_formed(&self) -> bool {
        ends_on_or_after(self.end_date, self.start_date)
    }

    /// True when both intervals share at least one calendar day.
    /// Touching intervals (`a.end + 1 == b.start`) do not overlap.
    pub fn overlaps(&self, other: &PriceInterval) -> bool {
        ends_on_or_after(other.end_date, self.start_date)
            && ends_on_or_after(self.end_date, other.start_date)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && ends_on_or_after(self.end_date, day)
    }

    /// Fragment `[start_date, before - 1]` at this interval's price
    fn leading_remainder(&self, before: NaiveDate) -> Option<PriceInterval> {
        let end = before.pred_opt()?;
        self.fragment(self.start_date, Some(end))
    }

    /// Fragment `[after + 1, end_date]` at this interval's price
    fn trailing_remainder(&self, after: NaiveDate) -> Option<PriceInterval> {
        let start = after.succ_opt()?;
        self.fragment(start, self.end_date)
    }

    fn fragment(&self, start: NaiveDate, end: Option<NaiveDate>) -> Option<PriceInterval> {
        let fragment = PriceInterval::new(self.product_id, self.price, start, end);
        // zero-length fragments are dropped rather than persisted
        fragment.is_well_formed().then_some(fragment)
    }
}

fn ends_on_or_after(end: Option<NaiveDate>, day: NaiveDate) -> bool {
    end.is_none_or(|end| day <= end)
}

/// Orders end bounds with the open end after every date
pub fn cmp_end(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

fn max_end(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match cmp_end(a, b) {
        Ordering::Less => b,
        _ => a,
    }
}

/// How a proposed interval relates to an existing interval it overlaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The proposal covers every day of the existing interval
    FullyOverwritten,
    /// The proposal starts after the existing interval and ends before it
    Inside,
    /// The proposal covers the head of the existing interval
    OverlapsStart,
    /// The proposal covers the tail of the existing interval
    OverlapsEnd,
}

/// Classify an overlapping `existing` interval against `proposal`.
///
/// Splits on `proposal.start <= existing.start` first, then on how the two
/// end bounds compare, so every pair maps to exactly one variant.
pub fn classify(proposal: &PriceInterval, existing: &PriceInterval) -> Overlap {
    if proposal.start_date <= existing.start_date {
        match (proposal.end_date, existing.end_date) {
            (None, _) => Overlap::FullyOverwritten,
            (Some(new_end), Some(old_end)) if new_end >= old_end => Overlap::FullyOverwritten,
            _ => Overlap::OverlapsStart,
        }
    } else {
        match (proposal.end_date, existing.end_date) {
            (_, None) => Overlap::Inside,
            (Some(new_end), Some(old_end)) if new_end < old_end => Overlap::Inside,
            _ => Overlap::OverlapsEnd,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("price interval starts on {start} but ends on {end}")]
    InvertedSpan { start: NaiveDate, end: NaiveDate },
    #[error("timeline of product {product_id} already has overlapping intervals {first:?} and {second:?}")]
    OverlappingTimeline {
        product_id: i32,
        first: Option<i32>,
        second: Option<i32>,
    },
}

/// Outcome of resolving one proposed interval.
///
/// Apply `removed`, then `created`, then insert `final_interval`. Every entry
/// of `removed` is a removal event carrying the interval as it was before
/// resolution; history records are derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub final_interval: PriceInterval,
    pub removed: Vec<PriceInterval>,
    pub created: Vec<PriceInterval>,
}

impl Resolution {
    /// True when the final interval differs from what was requested
    pub fn was_extended(&self, proposal: &PriceInterval) -> bool {
        self.final_interval.start_date != proposal.start_date
            || self.final_interval.end_date != proposal.end_date
    }
}

/// Resolve `proposal` against the product's current `timeline`.
///
/// Candidates are the intervals sharing at least one day with the proposal,
/// selected once from the requested bounds. Each candidate is removed; the
/// parts of it outside the proposal are re-created at its old price, unless
/// the price is equal, in which case the final interval absorbs its span.
pub fn resolve(
    proposal: &PriceInterval,
    timeline: &[PriceInterval],
) -> Result<Resolution, TimelineError> {
    if let Some(end) = proposal.end_date {
        if end < proposal.start_date {
            return Err(TimelineError::InvertedSpan {
                start: proposal.start_date,
                end,
            });
        }
    }
    ensure_disjoint(proposal.product_id, timeline)?;

    let mut candidates: Vec<&PriceInterval> =
        timeline.iter().filter(|existing| existing.overlaps(proposal)).collect();
    candidates.sort_by(|a, b| cmp_end(a.end_date, b.end_date));

    let mut final_interval = PriceInterval {
        id: None,
        ..proposal.clone()
    };
    let mut removed = Vec::with_capacity(candidates.len());
    let mut created = Vec::new();

    for candidate in candidates {
        let overlap = classify(proposal, candidate);
        let same_price = candidate.price == proposal.price;

        tracing::debug!(
            product_id = proposal.product_id,
            candidate_id = ?candidate.id,
            ?overlap,
            same_price,
            "Resolving overlapping price interval"
        );

        removed.push(candidate.clone());

        match overlap {
            Overlap::FullyOverwritten => {}
            Overlap::Inside if same_price => {
                final_interval.start_date = final_interval.start_date.min(candidate.start_date);
                final_interval.end_date = max_end(final_interval.end_date, candidate.end_date);
            }
            Overlap::Inside => {
                created.extend(candidate.leading_remainder(proposal.start_date));
                if let Some(new_end) = proposal.end_date {
                    created.extend(candidate.trailing_remainder(new_end));
                }
            }
            Overlap::OverlapsStart if same_price => {
                final_interval.end_date = max_end(final_interval.end_date, candidate.end_date);
            }
            Overlap::OverlapsStart => {
                if let Some(new_end) = proposal.end_date {
                    created.extend(candidate.trailing_remainder(new_end));
                }
            }
            Overlap::OverlapsEnd if same_price => {
                final_interval.start_date = final_interval.start_date.min(candidate.start_date);
            }
            Overlap::OverlapsEnd => {
                created.extend(candidate.leading_remainder(proposal.start_date));
            }
        }
    }

    Ok(Resolution {
        final_interval,
        removed,
        created,
    })
}

fn ensure_disjoint(product_id: i32, timeline: &[PriceInterval]) -> Result<(), TimelineError> {
    let mut sorted: Vec<&PriceInterval> = timeline.iter().collect();
    sorted.sort_by_key(|interval| interval.start_date);

    // sorted by start, any overlap shows up between neighbours
    match sorted.windows(2).find(|pair| pair[0].overlaps(pair[1])) {
        Some(pair) => Err(TimelineError::OverlappingTimeline {
            product_id,
            first: pair[0].id,
            second: pair[1].id,
        }),
        None => Ok(()),
    }
}
