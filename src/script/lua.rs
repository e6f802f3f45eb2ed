//! Lua implementation of [`ScriptHost`].
//!
//! Each bound marker source is evaluated once; the table it returns is
//! pinned in the Lua registry and addressed by a [`ScriptHandle`]. The pin
//! lasts until the handle is released or its [`TableLease`] is dropped.
//!
//! Scripts see a global `dgn` table:
//!
//! * `dgn.register_listener(kinds, x, y)` queues a listener request. `kinds`
//!   is a space or comma separated list of event names; `x`/`y` name the
//!   cell to watch and may be omitted for a level-wide listener.
//! * `dgn.log(message)` logs at info level.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use mlua::{Lua, LuaOptions, MultiValue, RegistryKey, StdLib, Table, Value};
use rustc_hash::FxHashMap;

use crate::core::{Coord, ScriptConfig};
use crate::events::{EventMask, ListenerRequest};

use super::{ScriptError, ScriptHandle, ScriptHost, ScriptValue, TableLease};

/// Deepest nested table converted back from Lua. Anything deeper reads as nil.
const MAX_TABLE_DEPTH: usize = 16;

type TableMap = RefCell<FxHashMap<ScriptHandle, RegistryKey>>;

/// A Lua state holding the tables of bound scripted markers.
pub struct LuaHost {
    lua: Lua,
    config: ScriptConfig,
    tables: Rc<TableMap>,
    next_handle: Cell<u64>,
    requests: Rc<RefCell<Vec<ListenerRequest>>>,
}

impl LuaHost {
    /// Create a sandboxed host with the default configuration.
    pub fn new() -> Result<Self, ScriptError> {
        Self::with_config(ScriptConfig::default())
    }

    /// Create a host from `config`.
    pub fn with_config(config: ScriptConfig) -> Result<Self, ScriptError> {
        let lua = if config.sandboxed {
            Lua::new_with(
                StdLib::TABLE | StdLib::STRING | StdLib::MATH,
                LuaOptions::default(),
            )
            .map_err(setup_error)?
        } else {
            Lua::new()
        };

        if let Some(limit) = config.memory_limit {
            lua.set_memory_limit(limit).map_err(setup_error)?;
        }

        let requests = Rc::new(RefCell::new(Vec::new()));
        install_dgn(&lua, Rc::clone(&requests)).map_err(setup_error)?;

        tracing::debug!(sandboxed = config.sandboxed, "lua host ready");
        Ok(Self {
            lua,
            config,
            tables: Rc::new(RefCell::new(FxHashMap::default())),
            next_handle: Cell::new(0),
            requests,
        })
    }

    /// The underlying Lua state.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// The configuration this host was built with.
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Compile `source` without running it.
    ///
    /// Uses a throwaway state with no libraries, so nothing the source
    /// names needs to exist yet.
    pub fn check_syntax(source: &str, context: &str) -> Result<(), ScriptError> {
        let lua = Lua::new_with(StdLib::NONE, LuaOptions::default()).map_err(setup_error)?;
        lua.load(source)
            .set_name(ScriptConfig::default().chunk_name(context))
            .into_function()
            .map_err(|err| ScriptError::Compile {
                context: context.to_string(),
                message: err.to_string(),
            })?;
        Ok(())
    }

    /// Number of tables currently bound.
    pub fn live_tables(&self) -> usize {
        self.tables.borrow().len()
    }

    fn table(&self, handle: ScriptHandle) -> Result<Table<'_>, ScriptError> {
        let tables = self.tables.borrow();
        let key = tables
            .get(&handle)
            .ok_or(ScriptError::UnknownHandle(handle))?;
        self.lua
            .registry_value(key)
            .map_err(|err| runtime_error("<registry>", &err))
    }
}

impl std::fmt::Debug for LuaHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuaHost")
            .field("config", &self.config)
            .field("live_tables", &self.live_tables())
            .finish()
    }
}

impl ScriptHost for LuaHost {
    fn bind(&self, source: &str, context: &str) -> Result<TableLease, ScriptError> {
        // Registry slots of dropped leases.
        self.lua.expire_registry_values();

        let value = self
            .lua
            .load(source)
            .set_name(self.config.chunk_name(context))
            .eval::<Value>()
            .map_err(|err| ScriptError::Compile {
                context: context.to_string(),
                message: err.to_string(),
            })?;

        let table = match value {
            Value::Table(table) => table,
            other => {
                return Err(ScriptError::NotATable {
                    context: context.to_string(),
                    found: other.type_name().to_string(),
                })
            }
        };

        let key = self
            .lua
            .create_registry_value(table)
            .map_err(setup_error)?;

        let handle = ScriptHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.tables.borrow_mut().insert(handle, key);

        let tables = Rc::downgrade(&self.tables);
        Ok(TableLease::new(handle, move |handle| {
            forget_table(&tables, handle);
        }))
    }

    fn has_function(&self, handle: ScriptHandle, name: &str) -> bool {
        match self.table(handle) {
            Ok(table) => matches!(table.get::<_, Value>(name), Ok(Value::Function(_))),
            Err(_) => false,
        }
    }

    fn call(
        &self,
        handle: ScriptHandle,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, ScriptError> {
        let table = self.table(handle)?;
        let function = match table.get::<_, Value>(name) {
            Ok(Value::Function(function)) => function,
            Ok(_) => {
                return Err(ScriptError::MissingFunction {
                    name: name.to_string(),
                })
            }
            Err(err) => return Err(runtime_error(name, &err)),
        };

        let mut values = Vec::with_capacity(args.len() + 1);
        values.push(Value::Table(table));
        for arg in args {
            values.push(to_lua(&self.lua, arg).map_err(|err| runtime_error(name, &err))?);
        }

        let result: Value = function
            .call(MultiValue::from_vec(values))
            .map_err(|err| runtime_error(name, &err))?;
        Ok(from_lua(&result, 0))
    }

    fn release(&self, handle: ScriptHandle) {
        let Some(key) = self.tables.borrow_mut().remove(&handle) else {
            return;
        };
        if let Err(err) = self.lua.remove_registry_value(key) {
            tracing::warn!(%handle, error = %err, "failed to release script table");
        }
    }

    fn take_listener_requests(&self) -> Vec<ListenerRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

/// Unpin a table whose lease was dropped. The registry slot is reclaimed on
/// the next bind.
fn forget_table(tables: &Weak<TableMap>, handle: ScriptHandle) {
    let Some(tables) = tables.upgrade() else {
        return;
    };
    match tables.try_borrow_mut() {
        Ok(mut tables) => {
            tables.remove(&handle);
        }
        Err(_) => tracing::warn!(%handle, "script table map busy, table not released"),
    };
}

fn install_dgn(lua: &Lua, requests: Rc<RefCell<Vec<ListenerRequest>>>) -> mlua::Result<()> {
    let dgn = lua.create_table()?;

    let register_listener = lua.create_function(
        move |_, (kinds, x, y): (String, Option<i32>, Option<i32>)| {
            let mask = EventMask::parse(&kinds).map_err(mlua::Error::external)?;
            let watch = match (x, y) {
                (Some(x), Some(y)) => Some(Coord::new(x, y)),
                _ => None,
            };
            requests.borrow_mut().push(ListenerRequest { mask, watch });
            Ok(())
        },
    )?;
    dgn.set("register_listener", register_listener)?;

    let log = lua.create_function(|_, message: String| {
        tracing::info!(target: "dungeon_markers::script", "{message}");
        Ok(())
    })?;
    dgn.set("log", log)?;

    lua.globals().set("dgn", dgn)
}

fn setup_error(err: mlua::Error) -> ScriptError {
    ScriptError::Setup {
        message: err.to_string(),
    }
}

fn runtime_error(function: &str, err: &mlua::Error) -> ScriptError {
    ScriptError::Runtime {
        function: function.to_string(),
        message: err.to_string(),
    }
}

fn to_lua<'lua>(lua: &'lua Lua, value: &ScriptValue) -> mlua::Result<Value<'lua>> {
    Ok(match value {
        ScriptValue::Nil => Value::Nil,
        ScriptValue::Bool(b) => Value::Boolean(*b),
        ScriptValue::Int(n) => Value::Integer(*n),
        ScriptValue::Number(n) => Value::Number(*n),
        ScriptValue::Str(s) => Value::String(lua.create_string(s)?),
        ScriptValue::Coord(c) => {
            let table = lua.create_table()?;
            table.set("x", c.x)?;
            table.set("y", c.y)?;
            Value::Table(table)
        }
        ScriptValue::Table(fields) => {
            let table = lua.create_table()?;
            for (key, field) in fields {
                table.set(key.as_str(), to_lua(lua, field)?)?;
            }
            Value::Table(table)
        }
    })
}

fn from_lua(value: &Value<'_>, depth: usize) -> ScriptValue {
    match value {
        Value::Boolean(b) => ScriptValue::Bool(*b),
        Value::Integer(n) => ScriptValue::Int(*n),
        Value::Number(n) => ScriptValue::Number(*n),
        Value::String(s) => ScriptValue::Str(String::from_utf8_lossy(s.as_bytes()).into_owned()),
        Value::Table(table) if depth < MAX_TABLE_DEPTH => {
            let mut fields: Vec<(String, ScriptValue)> = table
                .clone()
                .pairs::<Value, Value>()
                .filter_map(Result::ok)
                .filter_map(|(key, field)| {
                    let key = match key {
                        Value::String(s) => String::from_utf8_lossy(s.as_bytes()).into_owned(),
                        Value::Integer(n) => n.to_string(),
                        _ => return None,
                    };
                    Some((key, from_lua(&field, depth + 1)))
                })
                .collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            ScriptValue::Table(fields)
        }
        _ => ScriptValue::Nil,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> LuaHost {
        LuaHost::new().unwrap()
    }

    #[test]
    fn test_bind_requires_table() {
        let host = host();
        assert!(host.bind("return {}", "ok").is_ok());
        assert!(matches!(
            host.bind("return 42", "num"),
            Err(ScriptError::NotATable { found, .. }) if found == "integer"
        ));
        assert!(matches!(
            host.bind("return {", "broken"),
            Err(ScriptError::Compile { .. })
        ));
    }

    #[test]
    fn test_check_syntax_compiles_only() {
        assert_eq!(LuaHost::check_syntax("return { x = undefined_global }", "ok"), Ok(()));
        assert_eq!(LuaHost::check_syntax("return error('not run')", "ok"), Ok(()));
        assert!(matches!(
            LuaHost::check_syntax("return { this is not lua", "vault"),
            Err(ScriptError::Compile { context, .. }) if context == "vault"
        ));
    }

    #[test]
    fn test_call_passes_table_first() {
        let host = host();
        let lease = host
            .bind("return { n = 10, add = function(self, k) return self.n + k end }", "t")
            .unwrap();
        let handle = lease.handle();
        assert!(host.has_function(handle, "add"));
        assert!(!host.has_function(handle, "n"));

        let result = host.call(handle, "add", &[ScriptValue::Int(5)]).unwrap();
        assert_eq!(result, ScriptValue::Int(15));
    }

    #[test]
    fn test_missing_function_and_runtime_error() {
        let host = host();
        let lease = host
            .bind("return { boom = function(self) error('kaboom') end }", "t")
            .unwrap();
        let handle = lease.handle();
        assert_eq!(
            host.call(handle, "nope", &[]),
            Err(ScriptError::MissingFunction { name: "nope".into() })
        );
        match host.call(handle, "boom", &[]) {
            Err(ScriptError::Runtime { function, message }) => {
                assert_eq!(function, "boom");
                assert!(message.contains("kaboom"));
            }
            other => panic!("expected runtime error, got {other:?}"),
        }
    }

    #[test]
    fn test_coord_marshals_as_xy_table() {
        let host = host();
        let lease = host
            .bind("return { sum = function(self, p) return p.x * 100 + p.y end }", "t")
            .unwrap();
        let handle = lease.handle();
        let result = host
            .call(handle, "sum", &[ScriptValue::Coord(Coord::new(3, 4))])
            .unwrap();
        assert_eq!(result, ScriptValue::Int(304));
    }

    #[test]
    fn test_tables_come_back_sorted() {
        let host = host();
        let lease = host
            .bind("return { get = function(self) return { b = 2, a = 'x' } end }", "t")
            .unwrap();
        let handle = lease.handle();
        let result = host.call(handle, "get", &[]).unwrap();
        assert_eq!(
            result,
            ScriptValue::Table(vec![
                ("a".into(), ScriptValue::from("x")),
                ("b".into(), ScriptValue::Int(2)),
            ])
        );
    }

    #[test]
    fn test_release() {
        let host = host();
        let lease = host.bind("return {}", "t").unwrap();
        let handle = lease.handle();
        assert_eq!(host.live_tables(), 1);
        host.release(handle);
        host.release(handle);
        assert_eq!(host.live_tables(), 0);
        assert_eq!(
            host.call(handle, "x", &[]),
            Err(ScriptError::UnknownHandle(handle))
        );
        drop(lease);
        assert_eq!(host.live_tables(), 0);
    }

    #[test]
    fn test_dropping_lease_unpins_table() {
        let host = host();
        let kept = host.bind("return { v = function(self) return 1 end }", "kept").unwrap();
        let dropped = host.bind("return {}", "dropped").unwrap();
        let dropped_handle = dropped.handle();
        assert_ne!(kept.handle(), dropped_handle);
        assert_eq!(host.live_tables(), 2);

        drop(dropped);
        assert_eq!(host.live_tables(), 1);
        assert_eq!(
            host.call(dropped_handle, "v", &[]),
            Err(ScriptError::UnknownHandle(dropped_handle))
        );

        // The freed slot does not disturb tables bound before or after.
        let fresh = host.bind("return {}", "fresh").unwrap();
        assert!(fresh.handle() > dropped_handle);
        assert_eq!(host.call(kept.handle(), "v", &[]), Ok(ScriptValue::Int(1)));
    }

    #[test]
    fn test_lease_outliving_host_is_harmless() {
        let host = host();
        let lease = host.bind("return {}", "t").unwrap();
        drop(host);
        drop(lease);
    }

    #[test]
    fn test_register_listener_queues_requests() {
        let host = host();
        host.lua()
            .load("dgn.register_listener('turn_elapsed'); dgn.register_listener('player_moved', 2, 3)")
            .exec()
            .unwrap();
        let requests = host.take_listener_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].watch, None);
        assert_eq!(requests[1].watch, Some(Coord::new(2, 3)));
        assert!(host.take_listener_requests().is_empty());

        assert!(host
            .lua()
            .load("dgn.register_listener('no_such_event')")
            .exec()
            .is_err());
    }

    #[test]
    fn test_sandbox_hides_io() {
        let host = host();
        let lease = host
            .bind("return { has_io = function(self) return io ~= nil end }", "t")
            .unwrap();
        let handle = lease.handle();
        assert_eq!(host.call(handle, "has_io", &[]), Ok(ScriptValue::Bool(false)));
    }
}
