//! Movement history filtering and pagination.

use fungi_domain::{EntityId, Movement, MovementKind};

use crate::{CoreError, CoreResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Narrows a movement listing. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub item_id: Option<EntityId>,
    pub category_id: Option<EntityId>,
    pub supplier_id: Option<EntityId>,
}

impl MovementFilter {
    pub fn of_kind(kind: MovementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn matches(&self, movement: &Movement) -> bool {
        self.kind.map_or(true, |kind| movement.kind == kind)
            && self
                .item_id
                .as_ref()
                .map_or(true, |id| movement.item_id == *id)
            && self
                .category_id
                .as_ref()
                .map_or(true, |id| movement.category_id == *id)
            && self
                .supplier_id
                .as_ref()
                .map_or(true, |id| movement.supplier_id.as_ref() == Some(id))
    }
}

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> CoreResult<Self> {
        if page == 0 {
            return Err(CoreError::Validation("page numbers start at 1".into()));
        }
        if limit == 0 {
            return Err(CoreError::Validation("page size must be at least 1".into()));
        }
        Ok(Self { page, limit })
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Matching movements, newest first, cut to the requested page.
///
/// Movements sharing a date keep their stored order.
pub fn movement_history<'a>(
    movements: &'a [Movement],
    filter: &MovementFilter,
    request: PageRequest,
) -> CoreResult<Page<&'a Movement>> {
    let request = PageRequest::new(request.page, request.limit)?;
    let mut matching: Vec<&Movement> = movements.iter().filter(|m| filter.matches(m)).collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    let total = matching.len();
    let entries = matching
        .into_iter()
        .skip(request.offset())
        .take(request.limit)
        .collect();
    Ok(Page {
        entries,
        page: request.page,
        limit: request.limit,
        total,
    })
}
