// List+Modal View - the filterable table and create/edit form behind
// every page, independent of how it is drawn.
//
// Mode:  Listing ⇄ Searching,  Listing → Editing(form) → Listing
// Load:  Loading → Ready | Failed(message) → (retry) Loading

use crate::error::{FieldError, StoreError};
use crate::facade::{filter_records, Facade};
use crate::record::{FieldKind, Record, RecordId};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

// ============================================================================
// FORM
// ============================================================================

/// Modal form state: one text input per field of `T`
#[derive(Debug, Clone)]
pub struct Form<T: Record> {
    draft: T,
    inputs: Vec<String>,
    focus: usize,
    errors: Vec<FieldError>,
}

impl<T: Record> Form<T> {
    pub fn new(record: T) -> Self {
        let inputs = T::fields().iter().map(|spec| record.get(spec.field)).collect();
        Form {
            draft: record,
            inputs,
            focus: 0,
            errors: Vec::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.draft.is_new()
    }

    /// "Add Customer" / "Edit Customer"
    pub fn title(&self) -> String {
        let verb = if self.is_new() { "Add" } else { "Edit" };
        format!("{} {}", verb, T::KIND)
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.pop();
        }
    }

    /// Step a choice field through its options; other fields ignore this
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(spec) = T::fields().get(self.focus) else {
            return;
        };
        let FieldKind::Choice(options) = spec.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }

        let current = options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(self.inputs[self.focus].trim()));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
            (None, _) => 0,
        };
        self.inputs[self.focus] = options[next].to_string();
    }

    /// Parse every input into a copy of the draft
    pub fn build(&self) -> Result<T, Vec<FieldError>> {
        let mut record = self.draft.clone();
        let errors: Vec<FieldError> = T::fields()
            .iter()
            .zip(&self.inputs)
            .filter_map(|(spec, input)| record.set(spec.field, input).err())
            .collect();

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }
}

// ============================================================================
// LIST VIEW
// ============================================================================

#[derive(Debug, Clone)]
pub enum Mode<T: Record> {
    Listing,
    Searching,
    Editing(Form<T>),
}

pub struct ListView<T: Record> {
    facade: Facade<T>,
    all: Vec<T>,
    visible: Vec<T>,
    query: String,
    include_inactive: bool,
    selected: Option<usize>,
    mode: Mode<T>,
    load: LoadState,
    notice: Option<String>,
}

impl<T: Record> ListView<T> {
    /// Starts in `Loading`; nothing is fetched until `refresh`
    pub fn new(facade: Facade<T>) -> Self {
        ListView {
            facade,
            all: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            include_inactive: false,
            selected: None,
            mode: Mode::Listing,
            load: LoadState::Loading,
            notice: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    /// Everything from the last load, unfiltered
    pub fn all(&self) -> &[T] {
        &self.all
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn include_inactive(&self) -> bool {
        self.include_inactive
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&T> {
        self.selected.and_then(|i| self.visible.get(i))
    }

    pub fn mode(&self) -> &Mode<T> {
        &self.mode
    }

    pub fn form_mut(&mut self) -> Option<&mut Form<T>> {
        match &mut self.mode {
            Mode::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn facade_mut(&mut self) -> &mut Facade<T> {
        &mut self.facade
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the full collection and re-apply the filter
    pub fn refresh(&mut self) {
        match self.facade.list() {
            Ok(all) => {
                self.all = all;
                self.load = LoadState::Ready;
                self.recompute();
            }
            Err(e) => {
                warn!(kind = %T::KIND, error = %e, "failed to load collection");
                self.load = LoadState::Failed(format!(
                    "Failed to fetch {}s: {}",
                    T::KIND.as_str().to_lowercase(),
                    e
                ));
            }
        }
    }

    /// Manual retry: back to `Loading`, the caller refreshes after drawing
    pub fn request_reload(&mut self) {
        self.load = LoadState::Loading;
    }

    fn recompute(&mut self) {
        self.visible = filter_records(&self.all, &self.query, self.include_inactive);
        self.selected = match (self.selected, self.visible.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    pub fn start_search(&mut self) {
        if matches!(self.mode, Mode::Listing) {
            self.mode = Mode::Searching;
        }
    }

    pub fn finish_search(&mut self) {
        if matches!(self.mode, Mode::Searching) {
            self.mode = Mode::Listing;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn push_query_char(&mut self, ch: char) {
        self.query.push(ch);
        self.recompute();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.recompute();
    }

    pub fn toggle_include_inactive(&mut self) {
        self.include_inactive = !self.include_inactive;
        self.recompute();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
    }

    pub fn select_previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    pub fn select_first(&mut self) {
        if !self.visible.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.selected = Some(self.visible.len() - 1);
        }
    }

    /// Move the selection onto the record with `id`, if visible
    pub fn select_id(&mut self, id: RecordId) {
        if let Some(i) = self.visible.iter().position(|r| r.id() == id) {
            self.selected = Some(i);
        }
    }

    // ------------------------------------------------------------------
    // Modal form
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.notice = None;
        self.mode = Mode::Editing(Form::new(T::blank()));
    }

    pub fn open_edit(&mut self) {
        if let Some(record) = self.selected_record().cloned() {
            self.notice = None;
            self.mode = Mode::Editing(Form::new(record));
        }
    }

    pub fn cancel(&mut self) {
        self.mode = Mode::Listing;
    }

    /// Save the form. Success closes the modal and reloads; any failure
    /// keeps it open with the errors attached. An edit whose record is gone
    /// from the store counts as a failure.
    pub fn submit(&mut self) {
        let Mode::Editing(form) = &mut self.mode else {
            return;
        };

        let record = match form.build() {
            Ok(record) => record,
            Err(errors) => {
                form.errors = errors;
                return;
            }
        };

        match self.facade.save(record) {
            Ok(Some(saved)) => {
                self.mode = Mode::Listing;
                self.refresh();
                self.select_id(saved.id());
            }
            Ok(None) => {
                warn!(kind = %T::KIND, "edited record no longer exists");
                form.errors = vec![FieldError::new("Save", format!("{} not found", T::KIND))];
                self.refresh();
            }
            Err(StoreError::Validation { errors, .. }) => {
                form.errors = errors;
            }
            Err(e) => {
                form.errors = vec![FieldError::new("Save", e.to_string())];
            }
        }
    }

    // ------------------------------------------------------------------
    // Row actions
    // ------------------------------------------------------------------

    pub fn toggle_active_selected(&mut self) {
        let Some(id) = self.selected_record().map(|r| r.id()) else {
            return;
        };
        match self.facade.toggle_active(id) {
            Ok(Some(_)) => self.refresh(),
            Ok(None) => {
                self.notice = Some(format!("{} {} not found", T::KIND, id));
                self.refresh();
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_record().map(|r| r.id()) else {
            return;
        };
        match self.facade.remove(id) {
            Ok(()) => {
                self.notice = Some(format!("Deleted {} {}", T::KIND, id));
                self.refresh();
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }
}
