use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::{Error, Result};
use crate::frame::message_result::{ColumnSpec, QueryResult, Row};
use crate::statement::Query;
use crate::types::unmarshal::Unmarshal;

#[derive(Debug, Default)]
struct Page {
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
}

/// Iterator over the rows of a query result, spanning all of its pages. Following pages are
/// requested transparently; once enough of the current page has been consumed, the next one is
/// fetched in the background.
///
/// Execution and decoding errors are sticky: once an error is recorded, [`Iter::scan`] returns
/// `false` and [`Iter::close`] reports the error.
#[derive(Debug, Clone, Default)]
pub struct Iter {
    error: Option<Error>,
    pos: usize,
    page: Arc<Page>,
    next: Option<Arc<PageContinuation>>,
}

impl Iter {
    pub(crate) fn with_error(error: Error) -> Self {
        Iter {
            error: Some(error),
            ..Default::default()
        }
    }

    pub(crate) fn from_result(query: &Query, result: QueryResult) -> Self {
        let next = result.paging_state.map(|paging_state| {
            let prefetch_at =
                ((1.0 - query.prefetch()) * result.rows.len() as f64).max(0.0) as usize;

            Arc::new(PageContinuation::new(
                query.clone().with_paging_state(Some(paging_state)),
                prefetch_at,
            ))
        });

        Iter {
            error: None,
            pos: 0,
            page: Arc::new(Page {
                columns: result.columns,
                rows: result.rows,
            }),
            next,
        }
    }

    /// Metadata of the returned columns.
    #[inline]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.page.columns
    }

    /// Number of rows in the current page.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.page.rows.len()
    }

    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Decodes the next row into `dest`, one destination per column. Returns `false` when no more
    /// rows are available or an error occurred; use [`Iter::close`] to tell these apart.
    pub async fn scan(&mut self, dest: &mut [&mut dyn Unmarshal]) -> bool {
        loop {
            if self.error.is_some() {
                return false;
            }

            if self.pos < self.page.rows.len() {
                break;
            }

            match self.next.take() {
                Some(next) => *self = next.fetch().await,
                None => return false,
            }
        }

        if let Some(next) = &self.next {
            if self.pos >= next.prefetch_at {
                next.prefetch();
            }
        }

        if dest.len() != self.page.columns.len() {
            self.error = Some(Error::ColumnCountMismatch {
                expected: self.page.columns.len(),
                actual: dest.len(),
            });
            return false;
        }

        let row = &self.page.rows[self.pos];
        if row.len() != self.page.columns.len() {
            self.error = Some(Error::Protocol(format!(
                "row has {} values, expected {}",
                row.len(),
                self.page.columns.len()
            )));
            return false;
        }

        for ((column, value), dest) in self.page.columns.iter().zip(row).zip(dest.iter_mut()) {
            if let Err(error) = dest.unmarshal(column, value.as_deref()) {
                self.error = Some(error);
                return false;
            }
        }

        self.pos += 1;
        true
    }

    /// Finishes iteration and returns the error which stopped it, if any.
    pub fn close(&self) -> Result<()> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Lazily fetched next page, shared by every clone of the iterator which produced it. The page is
/// requested at most once no matter how many callers ask for it concurrently.
#[derive(Debug)]
pub(crate) struct PageContinuation {
    query: Query,
    prefetch_at: usize,
    scheduled: AtomicBool,
    fetched: OnceCell<Iter>,
}

impl PageContinuation {
    fn new(query: Query, prefetch_at: usize) -> Self {
        PageContinuation {
            query,
            prefetch_at,
            scheduled: AtomicBool::new(false),
            fetched: OnceCell::new(),
        }
    }

    /// Returns the next page, fetching it if no one did yet.
    async fn fetch(&self) -> Iter {
        self.fetched
            .get_or_init(|| self.query.session().execute_query(&self.query))
            .await
            .clone()
    }

    /// Starts fetching the next page in the background, unless already started.
    fn prefetch(self: &Arc<Self>) {
        if self.scheduled.swap(true, Ordering::AcqRel) {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            this.fetch().await;
        });
    }
}
