//! The transaction ledger state: cached rows, local edits, filters and paging.
//!
//! [TransactionViewModel] never performs I/O. Operations that need the
//! backend hand back a request ([FetchRequest], [SaveBatch]) for the caller
//! to dispatch, and the caller reports the outcome back with
//! [TransactionViewModel::merge_fetched], [TransactionViewModel::fetch_failed]
//! or [TransactionViewModel::complete_save].

use std::collections::{BTreeMap, btree_map::Entry};

use crate::{
    Error,
    api::{EditTransactionsRequest, LoadTransactionsRequest},
    category::CustomCategory,
    config::{ClientConfig, SaveFailurePolicy},
    database_id::TransactionId,
};

use super::{
    core::{Transaction, TransactionBuilder},
    edit::TransactionEdit,
    filter::{FilterUpdate, SortOrder, TransactionFilter, sort_transactions},
};

const NEW_TRANSACTION_PREFIX: &str = "New transaction";

/// Identifies the filter and page configuration a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Whether the current filter and page configuration has fetched more rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// No fetch has been considered for this configuration yet.
    Unfetched,
    /// A fetch was requested and has not completed.
    InFlight(FetchTicket),
    /// The page was full or a fetch has been merged.
    Satisfied,
    /// The fetch failed. No new fetch is requested until the configuration
    /// changes.
    Failed,
}

/// A request for more transactions to fill the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Pass back to [TransactionViewModel::merge_fetched].
    pub ticket: FetchTicket,
    /// The body for `POST /load-transactions`.
    pub body: LoadTransactionsRequest,
}

/// The rows to display and, possibly, a fetch to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePage {
    /// The filtered, sorted rows of the current page.
    pub transactions: Vec<Transaction>,
    /// A fetch the caller should send, at most once per configuration.
    pub fetch: Option<FetchRequest>,
}

/// The result of merging fetched transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The rows were merged, `added` of them were new.
    Merged {
        /// The number of rows that were not cached already.
        added: usize,
    },
    /// The response belonged to an older configuration and was dropped.
    Stale,
}

/// Which way to move through the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    /// Towards page 0.
    Previous,
    /// Away from page 0.
    Next,
}

/// The save status of a local edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// Edited locally and not sent yet.
    Unsaved,
    /// Sent to the backend, waiting for the result.
    Saving,
    /// The backend did not confirm the save.
    SaveFailed,
}

#[derive(Debug, Clone, PartialEq)]
struct Draft {
    transaction: Transaction,
    status: DraftStatus,
    revision: u64,
}

/// Drafts sent to the backend in one `POST /edit-transactions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveBatch {
    transactions: Vec<Transaction>,
    revisions: Vec<u64>,
    create_rule: bool,
}

impl SaveBatch {
    /// The request body for the batch.
    pub fn request(&self) -> EditTransactionsRequest {
        EditTransactionsRequest {
            transactions: self.transactions.clone(),
            create_rule: self.create_rule,
        }
    }

    /// The number of transactions in the batch.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the batch has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// The client-side transaction ledger.
#[derive(Debug, Clone)]
pub struct TransactionViewModel {
    cache: BTreeMap<TransactionId, Transaction>,
    drafts: BTreeMap<TransactionId, Draft>,
    filter: TransactionFilter,
    page: usize,
    page_size: usize,
    sort_order: SortOrder,
    fetch_state: FetchState,
    generation: u64,
    next_local_id: TransactionId,
    next_revision: u64,
    save_failure_policy: SaveFailurePolicy,
    custom_categories: Vec<CustomCategory>,
}

impl TransactionViewModel {
    /// Create an empty ledger showing `page_size` rows per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            cache: BTreeMap::new(),
            drafts: BTreeMap::new(),
            filter: TransactionFilter::default(),
            page: 0,
            page_size,
            sort_order: SortOrder::default(),
            fetch_state: FetchState::Unfetched,
            generation: 0,
            next_local_id: -1,
            next_revision: 0,
            save_failure_policy: SaveFailurePolicy::default(),
            custom_categories: Vec::new(),
        }
    }

    /// Create an empty ledger with the paging, sorting and save settings of
    /// `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.pagination.page_size)
            .with_sort_order(config.sort_order)
            .with_save_failure_policy(config.save_failure_policy)
    }

    /// Set the order transactions are sorted by date.
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Set what happens to drafts when a save fails.
    pub fn with_save_failure_policy(mut self, policy: SaveFailurePolicy) -> Self {
        self.save_failure_policy = policy;
        self
    }

    /// Set the user-defined categories used to search by category name.
    pub fn set_custom_categories(&mut self, custom_categories: Vec<CustomCategory>) {
        self.custom_categories = custom_categories;
    }

    /// The user-defined categories.
    pub fn custom_categories(&self) -> &[CustomCategory] {
        &self.custom_categories
    }

    /// The active filters.
    pub fn filter(&self) -> &TransactionFilter {
        &self.filter
    }

    /// The zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// The number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The fetch state of the current configuration.
    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    /// The number of cached transactions, including local-only rows.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no transactions are cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// The transaction as displayed: its draft if it has one, otherwise the
    /// cached record.
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.drafts
            .get(&id)
            .map(|draft| &draft.transaction)
            .or_else(|| self.cache.get(&id))
    }

    /// The record last confirmed by the backend, ignoring drafts.
    pub fn canonical(&self, id: TransactionId) -> Option<&Transaction> {
        self.cache.get(&id)
    }

    /// The save status of the draft for `id`, if there is one.
    pub fn draft_status(&self, id: TransactionId) -> Option<DraftStatus> {
        self.drafts.get(&id).map(|draft| draft.status)
    }

    /// The number of drafts not yet confirmed by the backend.
    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    /// Every transaction that passes the filters, drafts overlaid and sorted.
    pub fn visible_transactions(&self) -> Vec<Transaction> {
        let matcher = self.filter.matcher(&self.custom_categories);

        let mut transactions: Vec<Transaction> = self
            .cache
            .keys()
            .filter_map(|id| self.get(*id))
            .filter(|transaction| matcher.matches(transaction))
            .cloned()
            .collect();
        sort_transactions(&mut transactions, self.sort_order);

        transactions
    }

    /// The rows of the current page without considering a fetch.
    pub fn page_transactions(&self) -> Vec<Transaction> {
        self.visible_transactions()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Compute the rows of the current page.
    ///
    /// The first time this is called for a filter and page configuration, a
    /// short page yields a [FetchRequest] and the configuration moves to
    /// [FetchState::InFlight]. Later calls return the same rows and no
    /// request until the configuration changes.
    pub fn compute_visible_page(&mut self) -> VisiblePage {
        let transactions = self.page_transactions();

        let fetch = match self.fetch_state {
            FetchState::Unfetched if transactions.len() < self.page_size => {
                let ticket = FetchTicket(self.generation);
                self.fetch_state = FetchState::InFlight(ticket);
                tracing::debug!(
                    "Page {} has {} of {} rows, requesting more",
                    self.page,
                    transactions.len(),
                    self.page_size
                );

                Some(FetchRequest {
                    ticket,
                    body: self.load_request(),
                })
            }
            FetchState::Unfetched => {
                self.fetch_state = FetchState::Satisfied;
                None
            }
            _ => None,
        };

        VisiblePage {
            transactions,
            fetch,
        }
    }

    fn load_request(&self) -> LoadTransactionsRequest {
        let start_i = self.page * self.page_size;

        LoadTransactionsRequest {
            start_i,
            end_i: start_i + self.page_size,
            search: self.filter.search.clone(),
            start: self.filter.start.clone(),
            end: self.filter.end.clone(),
            category: self.filter.category,
        }
    }

    /// Merge the response to the fetch identified by `ticket`.
    ///
    /// Rows whose ID is already cached are skipped so cached rows and
    /// drafts are never overwritten. A response for an older configuration
    /// is dropped.
    pub fn merge_fetched(
        &mut self,
        ticket: FetchTicket,
        transactions: Vec<Transaction>,
    ) -> MergeOutcome {
        if self.fetch_state != FetchState::InFlight(ticket) {
            tracing::debug!("Discarding stale fetch response for {ticket:?}");
            return MergeOutcome::Stale;
        }

        let mut added = 0;
        for transaction in transactions {
            if let Entry::Vacant(entry) = self.cache.entry(transaction.id) {
                entry.insert(transaction);
                added += 1;
            }
        }

        self.fetch_state = FetchState::Satisfied;
        tracing::debug!("Merged {added} new transactions");

        MergeOutcome::Merged { added }
    }

    /// Record that the fetch identified by `ticket` failed.
    pub fn fetch_failed(&mut self, ticket: FetchTicket) {
        if self.fetch_state == FetchState::InFlight(ticket) {
            tracing::warn!("Fetch for page {} failed", self.page);
            self.fetch_state = FetchState::Failed;
        }
    }

    /// Apply `edit` to the transaction, on top of any earlier draft.
    ///
    /// The change is visible immediately through [Self::get] and
    /// [Self::compute_visible_page]; the cached record only changes once the
    /// save is confirmed.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if `id` is not cached and
    /// [Error::InvalidAmount] if the new amount is NaN or infinite. Nothing
    /// changes on error.
    pub fn apply_edit(&mut self, id: TransactionId, edit: TransactionEdit) -> Result<(), Error> {
        edit.validate()?;
        let mut transaction = self
            .get(id)
            .cloned()
            .ok_or(Error::TransactionNotFound(id))?;
        edit.apply_to(&mut transaction);

        self.next_revision += 1;
        self.drafts.insert(
            id,
            Draft {
                transaction,
                status: DraftStatus::Unsaved,
                revision: self.next_revision,
            },
        );

        Ok(())
    }

    /// Discard the draft for `id`, showing the cached record again.
    pub fn discard_edit(&mut self, id: TransactionId) {
        self.drafts.remove(&id);
    }

    /// Collect every draft that is not already being saved and mark it
    /// [DraftStatus::Saving].
    ///
    /// Returns `None` if there is nothing to save. `create_rule` asks the
    /// backend to remember the description to category mapping.
    pub fn begin_save(&mut self, create_rule: bool) -> Option<SaveBatch> {
        let mut transactions = Vec::new();
        let mut revisions = Vec::new();

        for draft in self.drafts.values_mut() {
            if draft.status == DraftStatus::Saving {
                continue;
            }

            draft.status = DraftStatus::Saving;
            transactions.push(draft.transaction.clone());
            revisions.push(draft.revision);
        }

        if transactions.is_empty() {
            return None;
        }

        Some(SaveBatch {
            transactions,
            revisions,
            create_rule,
        })
    }

    /// Apply the outcome of saving `batch`.
    ///
    /// On success the saved versions become the cached records and their
    /// drafts are removed, unless the draft was edited again since the batch
    /// was taken. On failure the drafts are kept or dropped according to the
    /// [SaveFailurePolicy].
    pub fn complete_save(&mut self, batch: &SaveBatch, success: bool) {
        for (transaction, revision) in batch.transactions.iter().zip(&batch.revisions) {
            let id = transaction.id;
            let same_revision = self
                .drafts
                .get(&id)
                .is_some_and(|draft| draft.revision == *revision);

            if success {
                if same_revision {
                    self.drafts.remove(&id);
                }
                if let Some(cached) = self.cache.get_mut(&id) {
                    // Flags are toggled through their own endpoints, so the
                    // cached values are newer than the batch copy.
                    let (highlighted, ignored) = (cached.highlighted, cached.ignored);
                    *cached = transaction.clone();
                    cached.highlighted = highlighted;
                    cached.ignored = ignored;
                }
                continue;
            }

            if !same_revision {
                continue;
            }

            match self.save_failure_policy {
                SaveFailurePolicy::Retain => {
                    if let Some(draft) = self.drafts.get_mut(&id) {
                        draft.status = DraftStatus::SaveFailed;
                    }
                }
                SaveFailurePolicy::Rollback => {
                    self.drafts.remove(&id);
                }
            }
        }

        if success {
            tracing::debug!("Saved {} transactions", batch.len());
        } else {
            tracing::warn!(
                "Saving {} transactions failed, policy {:?}",
                batch.len(),
                self.save_failure_policy
            );
        }
    }

    /// Move one page forwards or backwards. Page 0 is the lower bound.
    pub fn change_page(&mut self, direction: PageDirection) {
        self.page = match direction {
            PageDirection::Previous => self.page.saturating_sub(1),
            PageDirection::Next => self.page + 1,
        };
        self.reset_fetch();
    }

    /// Jump to `page`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.reset_fetch();
    }

    /// Replace the filter fields set in `update`.
    ///
    /// Goes back to page 0 if the filter changed. Returns whether it changed.
    pub fn set_filter(&mut self, update: FilterUpdate) -> bool {
        let changed = self.filter.update(update);
        if changed {
            self.page = 0;
        }
        self.reset_fetch();

        changed
    }

    fn reset_fetch(&mut self) {
        self.generation += 1;
        self.fetch_state = FetchState::Unfetched;
    }

    /// Add a transaction that only exists locally until the backend assigns
    /// it an ID. Returns its temporary, negative ID.
    pub fn insert_local(&mut self, builder: TransactionBuilder) -> TransactionId {
        let id = self.next_local_id;
        self.next_local_id -= 1;
        self.cache.insert(id, builder.finalize(id));

        id
    }

    /// Replace temporary IDs with the IDs assigned by the backend, pairing
    /// them in order.
    ///
    /// # Errors
    /// Returns [Error::MismatchedIds] if the lists differ in length, in
    /// which case nothing is changed.
    pub fn assign_ids(
        &mut self,
        temp_ids: &[TransactionId],
        server_ids: &[TransactionId],
    ) -> Result<(), Error> {
        if temp_ids.len() != server_ids.len() {
            return Err(Error::MismatchedIds {
                expected: temp_ids.len(),
                got: server_ids.len(),
            });
        }

        for (temp_id, server_id) in temp_ids.iter().zip(server_ids) {
            if let Some(mut transaction) = self.cache.remove(temp_id) {
                transaction.id = *server_id;
                self.cache.insert(*server_id, transaction);
            }

            if let Some(mut draft) = self.drafts.remove(temp_id) {
                draft.transaction.id = *server_id;
                self.drafts.insert(*server_id, draft);
            }
        }

        Ok(())
    }

    /// Drop the transactions and their drafts.
    pub fn remove(&mut self, ids: &[TransactionId]) {
        for id in ids {
            self.cache.remove(id);
            self.drafts.remove(id);
        }
    }

    /// Flip the highlighted flag, returning the new value.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if `id` is not cached.
    pub fn toggle_highlight(&mut self, id: TransactionId) -> Result<bool, Error> {
        self.toggle(id, |transaction| &mut transaction.highlighted)
    }

    /// Flip the ignored flag, returning the new value.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if `id` is not cached.
    pub fn toggle_ignore(&mut self, id: TransactionId) -> Result<bool, Error> {
        self.toggle(id, |transaction| &mut transaction.ignored)
    }

    fn toggle(
        &mut self,
        id: TransactionId,
        flag: impl Fn(&mut Transaction) -> &mut bool,
    ) -> Result<bool, Error> {
        let cached = self
            .cache
            .get_mut(&id)
            .ok_or(Error::TransactionNotFound(id))?;
        let cached_flag = flag(cached);
        *cached_flag = !*cached_flag;
        let value = *cached_flag;

        if let Some(draft) = self.drafts.get_mut(&id) {
            *flag(&mut draft.transaction) = value;
        }

        Ok(value)
    }

    /// Replace cached rows with authoritative ones from the backend.
    ///
    /// Drafts are left in place so unsaved edits survive.
    pub fn reconcile(&mut self, transactions: Vec<Transaction>) {
        for transaction in transactions {
            self.cache.insert(transaction.id, transaction);
        }
    }

    /// The description for the next manually added transaction, numbered
    /// one past the highest "New transaction N" seen so far.
    pub fn next_new_description(&self) -> String {
        let highest = self
            .cache
            .keys()
            .filter_map(|id| self.get(*id))
            .filter_map(|transaction| {
                transaction
                    .description
                    .strip_prefix(NEW_TRANSACTION_PREFIX)?
                    .trim()
                    .parse::<u32>()
                    .ok()
            })
            .max()
            .unwrap_or(0);

        format!("{NEW_TRANSACTION_PREFIX} {}", highest + 1)
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Duration, macros::date};

    use crate::{
        Error,
        category::{Category, CategoryFilter, CustomCategory},
        config::SaveFailurePolicy,
        transaction::{SortOrder, Transaction, TransactionEdit},
    };

    use super::{
        DraftStatus, FetchState, FilterUpdate, MergeOutcome, PageDirection, TransactionViewModel,
    };

    const PAGE_SIZE: usize = 60;

    fn transaction(id: i64, date: Date, description: &str) -> Transaction {
        Transaction::build(-10.0, date, description).finalize(id)
    }

    /// `count` transactions with IDs 1..=count, one per day in order.
    fn transactions(count: i64) -> Vec<Transaction> {
        (1..=count)
            .map(|id| {
                transaction(
                    id,
                    date!(2024 - 01 - 01) + Duration::days(id),
                    &format!("transaction #{id}"),
                )
            })
            .collect()
    }

    fn view_model_with(cached: Vec<Transaction>) -> TransactionViewModel {
        let mut view_model = TransactionViewModel::new(PAGE_SIZE);
        view_model.reconcile(cached);
        view_model
    }

    fn ids(transactions: &[Transaction]) -> Vec<i64> {
        transactions.iter().map(|transaction| transaction.id).collect()
    }

    #[test]
    fn merge_skips_transactions_already_cached() {
        let mut view_model = view_model_with(transactions(3));
        let ticket = view_model.compute_visible_page().fetch.unwrap().ticket;
        let before = view_model.get(2).cloned().unwrap();

        let mut duplicate = before.clone();
        duplicate.description = "changed on the server".to_owned();
        let got = view_model.merge_fetched(
            ticket,
            vec![duplicate, transaction(4, date!(2024 - 02 - 01), "new")],
        );

        assert_eq!(got, MergeOutcome::Merged { added: 1 });
        assert_eq!(view_model.get(2), Some(&before));
        assert_eq!(view_model.len(), 4);
        assert_eq!(view_model.fetch_state(), FetchState::Satisfied);
    }

    #[test]
    fn repeated_computation_is_identical() {
        let mut view_model = view_model_with(transactions(80));
        view_model.set_filter(FilterUpdate::default().search("#1"));

        let first = view_model.compute_visible_page();
        let second = view_model.compute_visible_page();

        assert_eq!(first.transactions, second.transactions);
        assert!(second.fetch.is_none());
    }

    #[test]
    fn equal_dates_sort_by_id_not_description() {
        let day = date!(2024 - 05 - 05);
        let view_model = view_model_with(vec![
            transaction(7, day, "AAA"),
            transaction(5, day, "ZZZ"),
        ]);

        assert_eq!(ids(&view_model.visible_transactions()), vec![5, 7]);
    }

    #[test]
    fn sorts_by_date_ascending_by_default() {
        let view_model = view_model_with(vec![
            transaction(1, date!(2024 - 05 - 09), "later"),
            transaction(2, date!(2024 - 05 - 01), "earlier"),
        ]);

        assert_eq!(ids(&view_model.visible_transactions()), vec![2, 1]);
    }

    #[test]
    fn sort_order_can_be_newest_first() {
        let mut view_model =
            TransactionViewModel::new(PAGE_SIZE).with_sort_order(SortOrder::Descending);
        view_model.reconcile(vec![
            transaction(2, date!(2024 - 05 - 01), "earlier"),
            transaction(1, date!(2024 - 05 - 09), "later"),
        ]);

        assert_eq!(ids(&view_model.visible_transactions()), vec![1, 2]);
    }

    #[test]
    fn pages_are_sliced_by_page_size() {
        let all = transactions(150);
        let mut view_model = view_model_with(all.clone());

        let page_0 = view_model.compute_visible_page().transactions;
        view_model.change_page(PageDirection::Next);
        let page_1 = view_model.compute_visible_page().transactions;
        view_model.change_page(PageDirection::Next);
        let page_2 = view_model.compute_visible_page().transactions;
        view_model.change_page(PageDirection::Next);
        let page_3 = view_model.compute_visible_page().transactions;

        assert_eq!(page_0, all[0..60]);
        assert_eq!(page_1, all[60..120]);
        assert_eq!(page_2, all[120..150]);
        assert_eq!(page_2.len(), 30);
        assert!(page_3.is_empty());
    }

    #[test]
    fn any_category_is_same_as_no_category_filter() {
        let mut cached = transactions(20);
        cached[3].categories = vec![Category::from(15)];
        let mut view_model = view_model_with(cached);
        let unfiltered = view_model.visible_transactions();

        view_model.set_filter(FilterUpdate::default().category(CategoryFilter::Any));

        assert_eq!(view_model.visible_transactions(), unfiltered);
    }

    #[test]
    fn category_filter_keeps_only_matching_category() {
        let mut cached = transactions(20);
        cached[3].categories = vec![Category::from(15)];
        let mut view_model = view_model_with(cached);

        view_model.set_filter(
            FilterUpdate::default().category(CategoryFilter::Only(Category::from(15))),
        );

        assert_eq!(ids(&view_model.visible_transactions()), vec![4]);
    }

    #[test]
    fn search_ignores_case() {
        let mut view_model = view_model_with(vec![
            transaction(1, date!(2024 - 01 - 01), "Coffee Shop"),
            transaction(2, date!(2024 - 01 - 01), "Rent"),
        ]);

        view_model.set_filter(FilterUpdate::default().search("coffee"));

        assert_eq!(ids(&view_model.visible_transactions()), vec![1]);
    }

    #[test]
    fn amount_threshold_is_inclusive() {
        let day = date!(2024 - 01 - 01);
        let mut view_model =
            view_model_with(vec![Transaction::build(-200.0, day, "TV").finalize(1)]);

        view_model.set_filter(FilterUpdate::default().min_amount(200.0));
        assert_eq!(view_model.visible_transactions().len(), 1);

        view_model.set_filter(FilterUpdate::default().min_amount(200.01));
        assert!(view_model.visible_transactions().is_empty());
    }

    #[test]
    fn edit_is_visible_before_save() {
        let mut view_model = view_model_with(transactions(3));

        view_model
            .apply_edit(2, TransactionEdit::default().description("X"))
            .unwrap();

        assert_eq!(view_model.get(2).unwrap().description, "X");
        assert_eq!(view_model.canonical(2).unwrap().description, "transaction #2");
        let visible = view_model.compute_visible_page().transactions;
        assert_eq!(visible[1].description, "X");
    }

    #[test]
    fn edits_stack_on_earlier_drafts() {
        let mut view_model = view_model_with(transactions(1));

        view_model
            .apply_edit(1, TransactionEdit::default().description("X"))
            .unwrap();
        view_model
            .apply_edit(1, TransactionEdit::default().notes("note"))
            .unwrap();

        let got = view_model.get(1).unwrap();
        assert_eq!(got.description, "X");
        assert_eq!(got.notes, "note");
        assert_eq!(view_model.draft_count(), 1);
    }

    #[test]
    fn editing_unknown_transaction_fails() {
        let mut view_model = view_model_with(transactions(1));

        let got = view_model.apply_edit(42, TransactionEdit::default().description("X"));

        assert_eq!(got, Err(Error::TransactionNotFound(42)));
    }

    #[test]
    fn non_finite_amount_is_not_accepted_into_draft() {
        let mut view_model = view_model_with(transactions(1));

        let got = view_model.apply_edit(1, TransactionEdit::default().amount(f64::NAN));

        assert!(matches!(got, Err(Error::InvalidAmount(_))));
        assert_eq!(view_model.draft_count(), 0);
        assert_eq!(view_model.get(1).unwrap().amount, -10.0);
    }

    #[test]
    fn short_page_requests_exactly_one_fetch() {
        let mut view_model = view_model_with(transactions(10));
        view_model.set_filter(FilterUpdate::default().search("transaction"));

        let first = view_model.compute_visible_page();
        let second = view_model.compute_visible_page();

        let request = first.fetch.expect("a short page should request a fetch");
        assert_eq!(request.body.start_i, 0);
        assert_eq!(request.body.end_i, 60);
        assert_eq!(request.body.search, "transaction");
        assert_eq!(request.body.category, CategoryFilter::Any);
        assert_eq!(first.transactions.len(), 10);
        assert!(second.fetch.is_none());
        assert_eq!(
            view_model.fetch_state(),
            FetchState::InFlight(request.ticket)
        );
    }

    #[test]
    fn full_page_does_not_fetch() {
        let mut view_model = view_model_with(transactions(60));

        let got = view_model.compute_visible_page();

        assert!(got.fetch.is_none());
        assert_eq!(view_model.fetch_state(), FetchState::Satisfied);
    }

    #[test]
    fn fetch_request_uses_page_offsets() {
        let mut view_model = view_model_with(transactions(70));
        view_model.change_page(PageDirection::Next);

        let request = view_model.compute_visible_page().fetch.unwrap();

        assert_eq!(request.body.start_i, 60);
        assert_eq!(request.body.end_i, 120);
    }

    #[test]
    fn page_change_allows_another_fetch() {
        let mut view_model = view_model_with(transactions(10));
        assert!(view_model.compute_visible_page().fetch.is_some());

        view_model.change_page(PageDirection::Next);

        assert!(view_model.compute_visible_page().fetch.is_some());
    }

    #[test]
    fn response_for_old_configuration_is_discarded() {
        let mut view_model = view_model_with(transactions(10));
        let old_ticket = view_model.compute_visible_page().fetch.unwrap().ticket;

        view_model.set_filter(FilterUpdate::default().search("rent"));
        let got = view_model.merge_fetched(
            old_ticket,
            vec![transaction(99, date!(2024 - 06 - 01), "late")],
        );

        assert_eq!(got, MergeOutcome::Stale);
        assert!(view_model.get(99).is_none());
        assert_eq!(view_model.fetch_state(), FetchState::Unfetched);
    }

    #[test]
    fn failed_fetch_is_not_retried_until_configuration_changes() {
        let mut view_model = view_model_with(transactions(10));
        let ticket = view_model.compute_visible_page().fetch.unwrap().ticket;

        view_model.fetch_failed(ticket);

        assert_eq!(view_model.fetch_state(), FetchState::Failed);
        assert!(view_model.compute_visible_page().fetch.is_none());
        view_model.set_filter(FilterUpdate::default().search("1"));
        assert!(view_model.compute_visible_page().fetch.is_some());
    }

    #[test]
    fn previous_page_is_clamped_at_zero() {
        let mut view_model = view_model_with(transactions(10));

        view_model.change_page(PageDirection::Previous);

        assert_eq!(view_model.page(), 0);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut view_model = view_model_with(transactions(10));
        view_model.change_page(PageDirection::Next);
        view_model.change_page(PageDirection::Next);

        assert!(!view_model.set_filter(FilterUpdate::default()));
        assert_eq!(view_model.page(), 2);

        assert!(view_model.set_filter(FilterUpdate::default().date_range("2024-01-01", "")));
        assert_eq!(view_model.page(), 0);
    }

    #[test]
    fn successful_save_promotes_drafts() {
        let mut view_model = view_model_with(transactions(2));
        view_model
            .apply_edit(1, TransactionEdit::default().amount(-99.0))
            .unwrap();

        let batch = view_model.begin_save(false).unwrap();
        assert_eq!(view_model.draft_status(1), Some(DraftStatus::Saving));
        assert_eq!(batch.request().transactions[0].amount, -99.0);
        view_model.complete_save(&batch, true);

        assert_eq!(view_model.draft_count(), 0);
        assert_eq!(view_model.canonical(1).unwrap().amount, -99.0);
    }

    #[test]
    fn nothing_to_save_yields_no_batch() {
        let mut view_model = view_model_with(transactions(2));

        assert!(view_model.begin_save(false).is_none());
    }

    #[test]
    fn failed_save_retains_drafts_by_default() {
        let mut view_model = view_model_with(transactions(2));
        view_model
            .apply_edit(1, TransactionEdit::default().description("X"))
            .unwrap();

        let batch = view_model.begin_save(false).unwrap();
        view_model.complete_save(&batch, false);

        assert_eq!(view_model.draft_status(1), Some(DraftStatus::SaveFailed));
        assert_eq!(view_model.get(1).unwrap().description, "X");
        assert_eq!(view_model.canonical(1).unwrap().description, "transaction #1");

        let retry = view_model.begin_save(false).unwrap();
        assert_eq!(retry.len(), 1);
    }

    #[test]
    fn failed_save_rolls_back_with_rollback_policy() {
        let mut view_model = TransactionViewModel::new(PAGE_SIZE)
            .with_save_failure_policy(SaveFailurePolicy::Rollback);
        view_model.reconcile(transactions(2));
        view_model
            .apply_edit(1, TransactionEdit::default().description("X"))
            .unwrap();

        let batch = view_model.begin_save(false).unwrap();
        view_model.complete_save(&batch, false);

        assert_eq!(view_model.draft_status(1), None);
        assert_eq!(view_model.get(1).unwrap().description, "transaction #1");
    }

    #[test]
    fn edit_during_save_survives_confirmation() {
        let mut view_model = view_model_with(transactions(1));
        view_model
            .apply_edit(1, TransactionEdit::default().description("first"))
            .unwrap();
        let batch = view_model.begin_save(false).unwrap();

        view_model
            .apply_edit(1, TransactionEdit::default().notes("second"))
            .unwrap();
        view_model.complete_save(&batch, true);

        assert_eq!(view_model.draft_status(1), Some(DraftStatus::Unsaved));
        assert_eq!(view_model.canonical(1).unwrap().description, "first");
        let shown = view_model.get(1).unwrap();
        assert_eq!(shown.description, "first");
        assert_eq!(shown.notes, "second");
    }

    #[test]
    fn toggle_during_save_survives_confirmation() {
        let mut view_model = view_model_with(transactions(1));
        view_model
            .apply_edit(1, TransactionEdit::default().description("X"))
            .unwrap();
        let batch = view_model.begin_save(false).unwrap();

        assert_eq!(view_model.toggle_highlight(1), Ok(true));
        view_model.complete_save(&batch, true);

        let saved = view_model.get(1).unwrap();
        assert!(saved.highlighted);
        assert_eq!(saved.description, "X");
        assert_eq!(view_model.draft_count(), 0);
    }

    #[test]
    fn assigns_server_ids_in_order() {
        let mut view_model = view_model_with(vec![]);
        let first = view_model.insert_local(Transaction::build(0.0, date!(2024 - 01 - 01), "a"));
        let second = view_model.insert_local(Transaction::build(0.0, date!(2024 - 01 - 02), "b"));
        assert!(first < 0 && second < 0 && first != second);

        view_model.assign_ids(&[first, second], &[40, 41]).unwrap();

        assert_eq!(view_model.get(40).unwrap().description, "a");
        assert_eq!(view_model.get(41).unwrap().description, "b");
        assert!(view_model.get(first).is_none());
    }

    #[test]
    fn mismatched_id_lists_are_rejected() {
        let mut view_model = view_model_with(vec![]);
        let temp = view_model.insert_local(Transaction::build(0.0, date!(2024 - 01 - 01), "a"));

        let got = view_model.assign_ids(&[temp], &[]);

        assert_eq!(got, Err(Error::MismatchedIds { expected: 1, got: 0 }));
        assert!(view_model.get(temp).is_some());
    }

    #[test]
    fn remove_drops_rows_and_drafts() {
        let mut view_model = view_model_with(transactions(3));
        view_model
            .apply_edit(2, TransactionEdit::default().description("X"))
            .unwrap();

        view_model.remove(&[2]);

        assert!(view_model.get(2).is_none());
        assert_eq!(view_model.draft_count(), 0);
    }

    #[test]
    fn toggles_flip_flags_on_cache_and_draft() {
        let mut view_model = view_model_with(transactions(1));
        view_model
            .apply_edit(1, TransactionEdit::default().description("X"))
            .unwrap();

        assert_eq!(view_model.toggle_highlight(1), Ok(true));
        assert!(view_model.get(1).unwrap().highlighted);
        assert!(view_model.canonical(1).unwrap().highlighted);
        assert_eq!(view_model.toggle_ignore(1), Ok(true));
        assert_eq!(view_model.toggle_ignore(1), Ok(false));
        assert_eq!(view_model.toggle_ignore(7), Err(Error::TransactionNotFound(7)));
    }

    #[test]
    fn reconcile_replaces_rows_but_keeps_drafts() {
        let mut view_model = view_model_with(transactions(2));
        view_model
            .apply_edit(1, TransactionEdit::default().description("X"))
            .unwrap();

        let mut updated = transactions(2);
        updated[0].pending = true;
        updated[1].description = "server".to_owned();
        view_model.reconcile(updated);

        assert_eq!(view_model.get(1).unwrap().description, "X");
        assert!(view_model.canonical(1).unwrap().pending);
        assert_eq!(view_model.get(2).unwrap().description, "server");
    }

    #[test]
    fn new_transaction_numbering_uses_highest_number() {
        let mut view_model = view_model_with(vec![
            transaction(1, date!(2024 - 01 - 01), "New transaction 9"),
            transaction(2, date!(2024 - 01 - 01), "New transaction 12"),
            transaction(3, date!(2024 - 01 - 01), "Rent"),
        ]);

        assert_eq!(view_model.next_new_description(), "New transaction 13");

        view_model.remove(&[1, 2]);
        assert_eq!(view_model.next_new_description(), "New transaction 1");
    }

    #[test]
    fn search_covers_custom_category_names() {
        let mut cached = transactions(2);
        cached[0].categories = vec![Category::Custom(3)];
        let mut view_model = view_model_with(cached);
        view_model.set_custom_categories(vec![CustomCategory {
            id: 3,
            name: "Hobbies".to_owned(),
        }]);

        view_model.set_filter(FilterUpdate::default().search("hobbies"));

        assert_eq!(ids(&view_model.visible_transactions()), vec![1]);
    }

    #[test]
    fn discarding_an_edit_shows_cached_record() {
        let mut view_model = view_model_with(transactions(1));
        view_model
            .apply_edit(1, TransactionEdit::default().description("Groceries"))
            .unwrap();

        view_model.discard_edit(1);

        assert_eq!(view_model.get(1).unwrap().description, "transaction #1");
        assert_eq!(view_model.draft_status(1), None);
    }

    #[test]
    fn jumping_to_a_page_requests_its_window() {
        let mut view_model = view_model_with(transactions(10));
        view_model.compute_visible_page();

        view_model.set_page(3);
        let fetch = view_model.compute_visible_page().fetch.unwrap();

        assert_eq!(view_model.page(), 3);
        assert_eq!((fetch.body.start_i, fetch.body.end_i), (180, 240));
    }
}
