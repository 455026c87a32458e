use herd_types::{Animal, AnimalFields, RecordEntry};

use crate::context::Context;
use crate::error::{ContractError, ContractResult};
use crate::guard::ScanGuard;

/// Existence-gated CRUD over animal records.
///
/// Every mutator checks presence first and fails with a typed error instead
/// of silently creating or overwriting. A key whose stored value is empty is
/// treated as absent everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimalContract;

impl AnimalContract {
    pub fn new() -> Self {
        Self
    }

    /// Lifecycle anchor invoked once before first use. Writes nothing.
    pub fn init_ledger(&self, _ctx: &Context<'_>) -> ContractResult<()> {
        tracing::info!("ledger initialized");
        Ok(())
    }

    /// `true` iff a non-empty value is stored under `id`.
    pub fn animal_exists(&self, ctx: &Context<'_>, id: &str) -> ContractResult<bool> {
        let value = ctx.stub().get_state(id)?;
        Ok(value.is_some_and(|v| !v.is_empty()))
    }

    /// Store a new record under `id`. Fails if `id` is already present.
    pub fn create_animal(
        &self,
        ctx: &Context<'_>,
        id: &str,
        fields: AnimalFields,
    ) -> ContractResult<()> {
        if self.animal_exists(ctx, id)? {
            return Err(ContractError::AlreadyExists { id: id.to_string() });
        }
        let animal = Animal::new(id, fields);
        ctx.stub().put_state(id, &animal.encode())?;
        tracing::info!(id, "animal created");
        Ok(())
    }

    /// The stored encoding for `id`, as text.
    pub fn read_animal(&self, ctx: &Context<'_>, id: &str) -> ContractResult<String> {
        let value = load(ctx, id)?;
        Ok(String::from_utf8_lossy(&value).into_owned())
    }

    /// The decoded record for `id`.
    pub fn read_animal_record(&self, ctx: &Context<'_>, id: &str) -> ContractResult<Animal> {
        let value = load(ctx, id)?;
        decode(id, &value)
    }

    /// Replace only the `name` of an existing record. Every other stored
    /// key, including ones `Animal` does not model, is kept as is.
    pub fn update_animal_name(
        &self,
        ctx: &Context<'_>,
        id: &str,
        new_name: &str,
    ) -> ContractResult<()> {
        let current = load(ctx, id)?;
        let updated = Animal::rename_encoded(&current, new_name).map_err(|e| {
            ContractError::Decode {
                id: id.to_string(),
                reason: e.to_string(),
            }
        })?;
        ctx.stub().put_state(id, &updated)?;
        tracing::info!(id, "animal renamed");
        Ok(())
    }

    /// Overwrite an existing record wholesale. Nothing but the key survives.
    pub fn update_animal(
        &self,
        ctx: &Context<'_>,
        id: &str,
        fields: AnimalFields,
    ) -> ContractResult<()> {
        if !self.animal_exists(ctx, id)? {
            return Err(ContractError::NotFound { id: id.to_string() });
        }
        let animal = Animal::new(id, fields);
        ctx.stub().put_state(id, &animal.encode())?;
        tracing::info!(id, "animal replaced");
        Ok(())
    }

    /// Remove an existing record. Deleting an absent key is an error.
    pub fn delete_animal(&self, ctx: &Context<'_>, id: &str) -> ContractResult<()> {
        if !self.animal_exists(ctx, id)? {
            return Err(ContractError::NotFound { id: id.to_string() });
        }
        ctx.stub().delete_state(id)?;
        tracing::info!(id, "animal deleted");
        Ok(())
    }

    /// Every stored value in key order.
    ///
    /// Values that do not decode as an [`Animal`] are returned as
    /// [`RecordEntry::Raw`] instead of failing the scan. Iterator errors abort
    /// the scan; the cursor is released either way.
    pub fn get_all_animals(&self, ctx: &Context<'_>) -> ContractResult<Vec<RecordEntry>> {
        let mut scan = ScanGuard::open(ctx.stub(), "", "")?;
        let mut entries = Vec::new();
        while let Some(kv) = scan.next_entry()? {
            match Animal::decode(&kv.value) {
                Ok(animal) => entries.push(RecordEntry::Decoded(animal)),
                Err(e) => {
                    tracing::warn!(key = %kv.key, error = %e, "undecodable value, returning raw");
                    entries.push(RecordEntry::Raw(kv.value));
                }
            }
        }
        scan.finish()?;
        tracing::debug!(count = entries.len(), "scanned animals");
        Ok(entries)
    }

    /// [`get_all_animals`](Self::get_all_animals) rendered as a JSON array.
    pub fn get_all_animals_json(&self, ctx: &Context<'_>) -> ContractResult<String> {
        let entries = self.get_all_animals(ctx)?;
        Ok(RecordEntry::list_to_json(&entries))
    }
}

/// Stored bytes for `id`; absent and empty values are both `NotFound`.
fn load(ctx: &Context<'_>, id: &str) -> ContractResult<Vec<u8>> {
    match ctx.stub().get_state(id)? {
        Some(value) if !value.is_empty() => {
            tracing::debug!(id, bytes = value.len(), "read animal");
            Ok(value)
        }
        _ => Err(ContractError::NotFound { id: id.to_string() }),
    }
}

fn decode(id: &str, value: &[u8]) -> ContractResult<Animal> {
    Animal::decode(value).map_err(|e| ContractError::Decode {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use herd_state::{
        InMemoryWorldState, KeyValue, StateError, StateIterator, StateResult, VecStateIterator,
        WorldState,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fields(name: &str) -> AnimalFields {
        AnimalFields {
            name: name.into(),
            kind: "Dog".into(),
            breed: "Lab".into(),
            birth_date: "2020-01-01".into(),
            description: "desc".into(),
            img_url: "http://x".into(),
            pedigree: true,
        }
    }

    fn other_fields() -> AnimalFields {
        AnimalFields {
            name: "Tom".into(),
            kind: "Cat".into(),
            breed: "Siamese".into(),
            birth_date: "2018-07-07".into(),
            description: "indoor".into(),
            img_url: "http://y".into(),
            pedigree: false,
        }
    }

    /// World state whose range iterator fails after `fail_after` entries.
    struct FailingScanState {
        inner: InMemoryWorldState,
        fail_after: usize,
        open: Arc<AtomicUsize>,
    }

    struct FailingIterator {
        inner: VecStateIterator,
        remaining: usize,
    }

    impl StateIterator for FailingIterator {
        fn next_entry(&mut self) -> StateResult<Option<KeyValue>> {
            if self.remaining == 0 {
                return Err(StateError::Iterator("cursor lost".into()));
            }
            self.remaining -= 1;
            self.inner.next_entry()
        }

        fn close(&mut self) -> StateResult<()> {
            self.inner.close()
        }

        fn is_closed(&self) -> bool {
            self.inner.is_closed()
        }
    }

    impl WorldState for FailingScanState {
        fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
            self.inner.get_state(key)
        }

        fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()> {
            self.inner.put_state(key, value)
        }

        fn delete_state(&self, key: &str) -> StateResult<()> {
            self.inner.delete_state(key)
        }

        fn get_state_by_range(
            &self,
            _start: &str,
            _end: &str,
        ) -> StateResult<Box<dyn StateIterator + '_>> {
            let entries = self
                .inner
                .raw_entries()?
                .into_iter()
                .map(|(k, v)| KeyValue::new(k, v))
                .collect();
            Ok(Box::new(FailingIterator {
                inner: VecStateIterator::tracked(entries, Arc::clone(&self.open)),
                remaining: self.fail_after,
            }))
        }
    }

    /// World state that is always unavailable.
    struct DownState;

    impl WorldState for DownState {
        fn get_state(&self, _key: &str) -> StateResult<Option<Vec<u8>>> {
            Err(StateError::Unavailable("peer offline".into()))
        }

        fn put_state(&self, _key: &str, _value: &[u8]) -> StateResult<()> {
            Err(StateError::Unavailable("peer offline".into()))
        }

        fn delete_state(&self, _key: &str) -> StateResult<()> {
            Err(StateError::Unavailable("peer offline".into()))
        }

        fn get_state_by_range(
            &self,
            _start: &str,
            _end: &str,
        ) -> StateResult<Box<dyn StateIterator + '_>> {
            Err(StateError::Unavailable("peer offline".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Existence
    // -----------------------------------------------------------------------

    #[test]
    fn exists_is_false_for_missing_and_empty_values() {
        let state = InMemoryWorldState::new();
        state.put_state("blank", b"").unwrap();
        let ctx = Context::new(&state);
        let contract = AnimalContract::new();

        assert!(!contract.animal_exists(&ctx, "missing").unwrap());
        assert!(!contract.animal_exists(&ctx, "blank").unwrap());
    }

    #[test]
    fn exists_does_not_write() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        AnimalContract.animal_exists(&ctx, "x").unwrap();
        assert!(state.is_empty().unwrap());
    }

    #[test]
    fn init_ledger_is_noop() {
        let state = InMemoryWorldState::new();
        AnimalContract.init_ledger(&Context::new(&state)).unwrap();
        assert!(state.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Create / Read
    // -----------------------------------------------------------------------

    #[test]
    fn create_then_read() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        let contract = AnimalContract::new();

        contract.create_animal(&ctx, "a1", fields("Rex")).unwrap();
        let animal = contract.read_animal_record(&ctx, "a1").unwrap();
        assert_eq!(animal, Animal::new("a1", fields("Rex")));

        let raw = contract.read_animal(&ctx, "a1").unwrap();
        assert_eq!(raw.as_bytes(), animal.encode().as_slice());
    }

    #[test]
    fn create_over_empty_value_succeeds() {
        let state = InMemoryWorldState::new();
        state.put_state("a1", b"").unwrap();
        let ctx = Context::new(&state);
        AnimalContract.create_animal(&ctx, "a1", fields("Rex")).unwrap();
        assert!(AnimalContract.animal_exists(&ctx, "a1").unwrap());
    }

    #[test]
    fn read_empty_value_is_not_found() {
        let state = InMemoryWorldState::new();
        state.put_state("a1", b"").unwrap();
        let ctx = Context::new(&state);
        assert!(matches!(
            AnimalContract.read_animal(&ctx, "a1"),
            Err(ContractError::NotFound { id }) if id == "a1"
        ));
    }

    #[test]
    fn read_record_on_garbage_is_decode_error() {
        let state = InMemoryWorldState::new();
        state.put_state("bad", b"{not json").unwrap();
        let ctx = Context::new(&state);

        assert_eq!(AnimalContract.read_animal(&ctx, "bad").unwrap(), "{not json");
        assert!(matches!(
            AnimalContract.read_animal_record(&ctx, "bad"),
            Err(ContractError::Decode { id, .. }) if id == "bad"
        ));
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    #[test]
    fn rename_keeps_other_fields() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        let contract = AnimalContract::new();
        contract.create_animal(&ctx, "a1", fields("Rex")).unwrap();

        contract.update_animal_name(&ctx, "a1", "Max").unwrap();
        let animal = contract.read_animal_record(&ctx, "a1").unwrap();
        assert_eq!(animal, Animal::new("a1", fields("Max")));
    }

    #[test]
    fn rename_keeps_extra_stored_keys() {
        let state = InMemoryWorldState::new();
        let stored = r#"{"ID":"a","birthDate":"","breed":"","description":"","imgUrl":"","name":"n","owner":"x","pedigree":false,"type":""}"#;
        state.put_state("a", stored.as_bytes()).unwrap();
        let ctx = Context::new(&state);

        AnimalContract.update_animal_name(&ctx, "a", "m").unwrap();
        assert_eq!(
            AnimalContract.read_animal(&ctx, "a").unwrap(),
            stored.replace(r#""name":"n""#, r#""name":"m""#)
        );
    }

    #[test]
    fn rename_on_garbage_fails_without_writing() {
        let state = InMemoryWorldState::new();
        state.put_state("bad", b"garbage").unwrap();
        let ctx = Context::new(&state);
        assert!(matches!(
            AnimalContract.update_animal_name(&ctx, "bad", "x"),
            Err(ContractError::Decode { .. })
        ));
        assert_eq!(state.get_state("bad").unwrap(), Some(b"garbage".to_vec()));
    }

    #[test]
    fn full_update_replaces_everything_but_id() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        let contract = AnimalContract::new();
        contract.create_animal(&ctx, "a1", fields("Rex")).unwrap();

        contract.update_animal(&ctx, "a1", other_fields()).unwrap();
        let animal = contract.read_animal_record(&ctx, "a1").unwrap();
        assert_eq!(animal, Animal::new("a1", other_fields()));
    }

    #[test]
    fn full_update_overwrites_garbage() {
        let state = InMemoryWorldState::new();
        state.put_state("bad", b"garbage").unwrap();
        let ctx = Context::new(&state);
        AnimalContract.update_animal(&ctx, "bad", fields("Rex")).unwrap();
        assert_eq!(
            AnimalContract.read_animal_record(&ctx, "bad").unwrap(),
            Animal::new("bad", fields("Rex"))
        );
    }

    #[test]
    fn updates_on_missing_are_not_found() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        assert!(matches!(
            AnimalContract.update_animal_name(&ctx, "missing", "x"),
            Err(ContractError::NotFound { .. })
        ));
        assert!(matches!(
            AnimalContract.update_animal(&ctx, "missing", fields("x")),
            Err(ContractError::NotFound { .. })
        ));
        assert!(state.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_then_delete_again() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        let contract = AnimalContract::new();
        contract.create_animal(&ctx, "a1", fields("Rex")).unwrap();

        contract.delete_animal(&ctx, "a1").unwrap();
        assert!(!contract.animal_exists(&ctx, "a1").unwrap());
        assert!(matches!(
            contract.delete_animal(&ctx, "a1"),
            Err(ContractError::NotFound { id }) if id == "a1"
        ));
    }

    // -----------------------------------------------------------------------
    // Full scan
    // -----------------------------------------------------------------------

    #[test]
    fn scan_empty_state() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        assert!(AnimalContract.get_all_animals(&ctx).unwrap().is_empty());
        assert_eq!(AnimalContract.get_all_animals_json(&ctx).unwrap(), "[]");
        assert_eq!(state.open_iterators(), 0);
    }

    #[test]
    fn scan_degrades_garbage_to_raw() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        AnimalContract.create_animal(&ctx, "a", fields("Rex")).unwrap();
        state.put_state("b", b"not an animal").unwrap();
        AnimalContract.create_animal(&ctx, "c", other_fields()).unwrap();

        let entries = AnimalContract.get_all_animals(&ctx).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_animal().unwrap().id, "a");
        assert_eq!(entries[1], RecordEntry::Raw(b"not an animal".to_vec()));
        assert_eq!(entries[2].as_animal().unwrap().id, "c");
        assert_eq!(state.open_iterators(), 0);
    }

    #[test]
    fn scan_json_shape() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        AnimalContract.create_animal(&ctx, "a", fields("Rex")).unwrap();
        state.put_state("z", b"raw").unwrap();

        let json = AnimalContract.get_all_animals_json(&ctx).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Rex");
        assert_eq!(items[0]["type"], "Dog");
        assert_eq!(items[1], "raw");
    }

    #[test]
    fn scan_error_releases_cursor() {
        let open = Arc::new(AtomicUsize::new(0));
        let state = FailingScanState {
            inner: InMemoryWorldState::new(),
            fail_after: 1,
            open: Arc::clone(&open),
        };
        let ctx = Context::new(&state);
        AnimalContract.create_animal(&ctx, "a", fields("Rex")).unwrap();
        AnimalContract.create_animal(&ctx, "b", fields("Max")).unwrap();

        let err = AnimalContract.get_all_animals(&ctx).unwrap_err();
        assert!(matches!(err, ContractError::State(StateError::Iterator(_))));
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    // -----------------------------------------------------------------------
    // Backend failures
    // -----------------------------------------------------------------------

    #[test]
    fn backend_errors_pass_through() {
        let ctx = Context::new(&DownState);
        assert!(matches!(
            AnimalContract.animal_exists(&ctx, "a"),
            Err(ContractError::State(StateError::Unavailable(_)))
        ));
        assert!(matches!(
            AnimalContract.create_animal(&ctx, "a", fields("Rex")),
            Err(ContractError::State(StateError::Unavailable(_)))
        ));
        assert!(matches!(
            AnimalContract.get_all_animals(&ctx),
            Err(ContractError::State(StateError::Unavailable(_)))
        ));
    }

    #[test]
    fn empty_id_is_rejected_by_state() {
        let state = InMemoryWorldState::new();
        let ctx = Context::new(&state);
        assert!(matches!(
            AnimalContract.create_animal(&ctx, "", fields("Rex")),
            Err(ContractError::State(StateError::EmptyKey))
        ));
    }
}
