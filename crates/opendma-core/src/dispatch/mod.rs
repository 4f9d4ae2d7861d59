
use crate::{
    cell::PropertyCell,
    error::{ErrorClass, ErrorOrigin, ObjectError, PropertyError},
    obs::{self, CallKind, ModelEvent},
    object::GenericObject,
    qname::QualifiedName,
    value::{Cardinality, DataKind, Shape, Value, ValueShape},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Accessor names with dispatch-level special handling: identity is
/// answered straight from the object handle, and the qualified name is
/// composed from two inner reads.
pub const METHOD_GET_ID: &str = "getId";
pub const METHOD_GET_QUALIFIED_NAME: &str = "getQualifiedName";
pub const METHOD_GET_NAMESPACE: &str = "getNamespace";
pub const METHOD_GET_NAME: &str = "getName";

///
/// MethodKind
///
/// Prefix classification of a conventional accessor name. Classification
/// only selects the handling path; whether the name means anything is the
/// method table's decision.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MethodKind {
    Getter,
    Setter,
    Unclassified,
}

#[must_use]
pub fn classify_method(name: &str) -> MethodKind {
    if name.starts_with("get") || name.starts_with("is") {
        MethodKind::Getter
    } else if name.starts_with("set") {
        MethodKind::Setter
    } else {
        MethodKind::Unclassified
    }
}

///
/// PropertyBinding
///
/// Descriptor behind one conventional accessor name: which property the
/// name maps to and the shape the interface promises for it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyBinding {
    pub qname: QualifiedName,
    pub kind: DataKind,
    pub cardinality: Cardinality,
}

impl PropertyBinding {
    #[must_use]
    pub fn new(qname: QualifiedName, kind: DataKind, cardinality: Cardinality) -> Self {
        Self {
            qname,
            kind,
            cardinality,
        }
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        Shape::new(self.kind, self.cardinality)
    }
}

///
/// RegistryError
///
/// Setup failures while assembling interfaces. These never surface from a
/// call; they belong to whoever builds the registry.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("interface '{qname}' is already registered")]
    AlreadyRegistered { qname: QualifiedName },

    #[error("interface '{interface}' binds method '{method}' twice with different targets")]
    MethodConflict {
        interface: QualifiedName,
        method: String,
    },
}

///
/// InterfaceDef
///
/// One capability interface: the accessor bundle a class or aspect
/// implies, as method name -> binding.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceDef {
    qname: QualifiedName,
    methods: BTreeMap<String, PropertyBinding>,
}

impl InterfaceDef {
    #[must_use]
    pub const fn new(qname: QualifiedName) -> Self {
        Self {
            qname,
            methods: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn qname(&self) -> &QualifiedName {
        &self.qname
    }

    /// Bind a method name. Rebinding with an identical target is an
    /// idempotent no-op; a different target is a conflict.
    pub fn bind(
        &mut self,
        method: impl Into<String>,
        binding: PropertyBinding,
    ) -> Result<(), RegistryError> {
        let method = method.into();

        if let Some(existing) = self.methods.get(&method) {
            if *existing == binding {
                return Ok(());
            }
            return Err(RegistryError::MethodConflict {
                interface: self.qname.clone(),
                method,
            });
        }

        self.methods.insert(method, binding);
        Ok(())
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&PropertyBinding> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &PropertyBinding)> {
        self.methods.iter().map(|(name, b)| (name.as_str(), b))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

///
/// InterfaceRegistry
///
/// Capability interfaces keyed by class/aspect name. Built once by the
/// catalog layer; facades only read it.
///

#[derive(Clone, Debug, Default)]
pub struct InterfaceRegistry {
    interfaces: BTreeMap<QualifiedName, InterfaceDef>,
}

impl InterfaceRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interfaces: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, def: InterfaceDef) -> Result<(), RegistryError> {
        let qname = def.qname().clone();
        if self.interfaces.contains_key(&qname) {
            return Err(RegistryError::AlreadyRegistered { qname });
        }

        self.interfaces.insert(qname, def);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, qname: &QualifiedName) -> Option<&InterfaceDef> {
        self.interfaces.get(qname)
    }

    #[must_use]
    pub fn contains(&self, qname: &QualifiedName) -> bool {
        self.interfaces.contains_key(qname)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceDef> {
        self.interfaces.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

///
/// CallReturn
///
/// The three result shapes a facade call can produce.
///

#[derive(Clone, Debug, PartialEq)]
pub enum CallReturn {
    /// A property read; `None` is a legal absent value.
    Value(Option<Value>),
    /// The composed qualified name of the object.
    QName(QualifiedName),
    /// A completed write.
    Unit,
}

///
/// DispatchError
///
/// Call-level failures, split by who must act: `UnsupportedMethod` and
/// `UnexpectedArgument` are the caller's problem, while the `Predefined*`
/// variants mean the data source broke the interface's guarantee.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DispatchError {
    #[error("no valid classes or aspects were requested")]
    NoCapabilities,

    #[error("unsupported method '{method}'")]
    UnsupportedMethod { method: String },

    #[error("method '{method}' takes no argument")]
    UnexpectedArgument { method: String },

    #[error("predefined property '{qname}' is missing from the object (method '{method}')")]
    MissingPredefined {
        method: String,
        qname: QualifiedName,
    },

    #[error("predefined property '{qname}' violates its declared contract (method '{method}'): {source}")]
    PredefinedShape {
        method: String,
        qname: QualifiedName,
        source: PropertyError,
    },

    #[error(transparent)]
    Object(ObjectError),

    #[error(transparent)]
    Property(PropertyError),
}

impl DispatchError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NoCapabilities | Self::UnsupportedMethod { .. } | Self::UnexpectedArgument { .. } => {
                ErrorClass::Unsupported
            }
            Self::MissingPredefined { .. } | Self::PredefinedShape { .. } => ErrorClass::ServiceFault,
            Self::Object(err) => err.class(),
            Self::Property(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Object(err) => err.origin(),
            Self::Property(err) => err.origin(),
            _ => ErrorOrigin::Dispatch,
        }
    }
}

///
/// Facade
///
/// Call-translation layer over one generic object: a method table assembled
/// from the requested capability interfaces, routed onto the object's typed
/// cells. Pure translation; no I/O and no locking of its own.
///

#[derive(Debug)]
pub struct Facade<'a> {
    object: &'a dyn GenericObject,
    capabilities: Vec<QualifiedName>,
    methods: BTreeMap<&'a str, &'a PropertyBinding>,
}

impl<'a> Facade<'a> {
    /// Assemble a facade for the requested class/aspect names. Unrecognized
    /// names are skipped; when none resolve the construction fails, since a
    /// facade with an empty table could only ever refuse calls.
    pub fn new(
        object: &'a dyn GenericObject,
        requested: &[QualifiedName],
        registry: &'a InterfaceRegistry,
    ) -> Result<Self, DispatchError> {
        let mut capabilities = Vec::new();
        let mut methods: BTreeMap<&'a str, &'a PropertyBinding> = BTreeMap::new();

        for qname in requested {
            let Some(def) = registry.get(qname) else {
                continue;
            };

            capabilities.push(qname.clone());
            for (name, binding) in def.methods() {
                // first requested interface wins on overlapping names
                methods.entry(name).or_insert(binding);
            }
        }

        if capabilities.is_empty() {
            return Err(DispatchError::NoCapabilities);
        }

        Ok(Self {
            object,
            capabilities,
            methods,
        })
    }

    ///
    /// INTROSPECTION
    ///

    #[must_use]
    pub fn object(&self) -> &dyn GenericObject {
        self.object
    }

    /// The interfaces that actually resolved, in request order.
    #[must_use]
    pub fn capabilities(&self) -> &[QualifiedName] {
        &self.capabilities
    }

    #[must_use]
    pub fn supports(&self, method: &str) -> bool {
        method == METHOD_GET_ID
            || method == METHOD_GET_QUALIFIED_NAME
            || self.methods.contains_key(method)
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().copied()
    }

    ///
    /// GENERIC PASSTHROUGH
    ///
    /// The minimal generic-object capability is forwarded to the underlying
    /// object as-is; its failures are never reclassified.
    ///

    pub fn property(&self, qname: &QualifiedName) -> Result<&'a PropertyCell, ObjectError> {
        self.object.property(qname)
    }

    pub fn property_value(&self, qname: &QualifiedName) -> Result<Option<Value>, ObjectError> {
        self.object.property_value(qname)
    }

    pub fn set_property(
        &self,
        qname: &QualifiedName,
        value: Option<Value>,
    ) -> Result<(), ObjectError> {
        self.object.set_property(qname, value)
    }

    ///
    /// CALLS
    ///

    /// Dispatch one conventional call. Getters take no argument; a setter's
    /// argument may be `None` to clear a single-valued property.
    pub fn invoke(&self, method: &str, arg: Option<Value>) -> Result<CallReturn, DispatchError> {
        let outcome = self.invoke_inner(method, arg);

        if let Err(err) = &outcome {
            obs::record(ModelEvent::DispatchFault { class: err.class() });
        }

        outcome
    }

    /// Invoke a getter and unwrap its value; the composed qualified name
    /// comes back in its string rendering. Refuses non-getter names before
    /// touching the object.
    pub fn get(&self, method: &str) -> Result<Option<Value>, DispatchError> {
        if classify_method(method) != MethodKind::Getter {
            return Err(DispatchError::UnsupportedMethod {
                method: method.to_string(),
            });
        }

        match self.invoke(method, None)? {
            CallReturn::Value(value) => Ok(value),
            CallReturn::QName(qname) => Ok(Some(Value::String(qname.to_string()))),
            // a getter never completes as a write
            CallReturn::Unit => Err(DispatchError::UnsupportedMethod {
                method: method.to_string(),
            }),
        }
    }

    /// Invoke a setter. Refuses non-setter names before touching the
    /// object, so a mistyped getter name cannot clear anything.
    pub fn set(&self, method: &str, value: Option<Value>) -> Result<(), DispatchError> {
        if classify_method(method) != MethodKind::Setter {
            return Err(DispatchError::UnsupportedMethod {
                method: method.to_string(),
            });
        }

        self.invoke(method, value).map(|_| ())
    }

    /// Composed qualified name of the object, read through the same
    /// dispatch path as any other getter.
    pub fn qualified_name(&self) -> Result<QualifiedName, DispatchError> {
        match self.invoke(METHOD_GET_QUALIFIED_NAME, None)? {
            CallReturn::QName(qname) => Ok(qname),
            // composition only ever returns QName
            CallReturn::Value(_) | CallReturn::Unit => Err(DispatchError::UnsupportedMethod {
                method: METHOD_GET_QUALIFIED_NAME.to_string(),
            }),
        }
    }

    fn invoke_inner(&self, method: &str, arg: Option<Value>) -> Result<CallReturn, DispatchError> {
        // Identity is answered from the object handle itself; the
        // descriptor table is never consulted for it.
        if method == METHOD_GET_ID {
            require_no_arg(method, arg.as_ref())?;
            obs::record(ModelEvent::DispatchCall {
                kind: CallKind::Forward,
            });
            return Ok(CallReturn::Value(Some(Value::Id(self.object.id()))));
        }

        if method == METHOD_GET_QUALIFIED_NAME {
            require_no_arg(method, arg.as_ref())?;
            obs::record(ModelEvent::DispatchCall {
                kind: CallKind::Compose,
            });
            return self.compose_qname().map(CallReturn::QName);
        }

        match classify_method(method) {
            MethodKind::Getter => {
                require_no_arg(method, arg.as_ref())?;
                obs::record(ModelEvent::DispatchCall {
                    kind: CallKind::Getter,
                });
                self.invoke_getter(method)
            }
            MethodKind::Setter => {
                obs::record(ModelEvent::DispatchCall {
                    kind: CallKind::Setter,
                });
                self.invoke_setter(method, arg)
            }
            MethodKind::Unclassified => Err(DispatchError::UnsupportedMethod {
                method: method.to_string(),
            }),
        }
    }

    fn invoke_getter(&self, method: &str) -> Result<CallReturn, DispatchError> {
        let binding = self.binding(method)?;
        let cell = self.predefined_cell(method, binding)?;

        let value = read_cell(cell, binding)
            .map_err(|err| reclassify_read(method, binding, err))?;

        Ok(CallReturn::Value(value))
    }

    fn invoke_setter(&self, method: &str, arg: Option<Value>) -> Result<CallReturn, DispatchError> {
        let binding = self.binding(method)?;
        let cell = self.predefined_cell(method, binding)?;

        // The interface promised this shape. A differently-declared cell is
        // the source's fault; only then is the argument judged.
        if cell.shape() != binding.shape() {
            return Err(DispatchError::PredefinedShape {
                method: method.to_string(),
                qname: binding.qname.clone(),
                source: PropertyError::InvalidDataType {
                    qname: binding.qname.clone(),
                    expected: binding.shape(),
                    found: ValueShape::Declared(cell.shape()),
                },
            });
        }

        cell.set_value(arg).map_err(DispatchError::Property)?;
        Ok(CallReturn::Unit)
    }

    /// Compose the object's qualified name from its namespace and name
    /// properties; no single property backs this accessor.
    fn compose_qname(&self) -> Result<QualifiedName, DispatchError> {
        let namespace = self.read_string(METHOD_GET_NAMESPACE)?;
        let local = self.read_string(METHOD_GET_NAME)?;
        Ok(QualifiedName::new(namespace, local))
    }

    /// Inner string read for composition. An absent value makes the object
    /// uncomposable, which the system model forbids.
    fn read_string(&self, method: &str) -> Result<String, DispatchError> {
        match self.invoke_inner(method, None)? {
            CallReturn::Value(Some(Value::String(s))) => Ok(s),
            _ => {
                let qname = self
                    .methods
                    .get(method)
                    .map_or_else(|| QualifiedName::new("", method), |b| b.qname.clone());

                Err(DispatchError::PredefinedShape {
                    method: method.to_string(),
                    qname: qname.clone(),
                    source: PropertyError::InvalidDataType {
                        qname,
                        expected: Shape::single(DataKind::String),
                        found: ValueShape::Missing,
                    },
                })
            }
        }
    }

    fn binding(&self, method: &str) -> Result<&'a PropertyBinding, DispatchError> {
        self.methods
            .get(method)
            .copied()
            .ok_or_else(|| DispatchError::UnsupportedMethod {
                method: method.to_string(),
            })
    }

    fn predefined_cell(
        &self,
        method: &str,
        binding: &PropertyBinding,
    ) -> Result<&'a PropertyCell, DispatchError> {
        match self.object.property(&binding.qname) {
            Ok(cell) => Ok(cell),
            Err(ObjectError::NotDeclared { qname }) => Err(DispatchError::MissingPredefined {
                method: method.to_string(),
                qname,
            }),
            Err(other) => Err(DispatchError::Object(other)),
        }
    }
}

fn require_no_arg(method: &str, arg: Option<&Value>) -> Result<(), DispatchError> {
    if arg.is_some() {
        return Err(DispatchError::UnexpectedArgument {
            method: method.to_string(),
        });
    }
    Ok(())
}

/// Route a descriptor-backed read through the cell's matching typed
/// accessor, then rebuild the generic value from the typed result. The
/// match is exhaustive over every (kind, cardinality) pair.
fn read_cell(cell: &PropertyCell, binding: &PropertyBinding) -> Result<Option<Value>, PropertyError> {
    use Cardinality::{Multi, Single};

    let value = match (binding.kind, binding.cardinality) {
        (DataKind::Blob, Single) => cell.blob()?.map(Value::Blob),
        (DataKind::Blob, Multi) => Some(collect(cell.blob_list()?, Value::Blob)),
        (DataKind::Boolean, Single) => cell.boolean()?.map(Value::Boolean),
        (DataKind::Boolean, Multi) => Some(collect(cell.boolean_list()?, Value::Boolean)),
        (DataKind::Content, Single) => cell.content()?.map(Value::Content),
        (DataKind::Content, Multi) => Some(collect(cell.content_list()?, Value::Content)),
        (DataKind::DateTime, Single) => cell.date_time()?.map(Value::DateTime),
        (DataKind::DateTime, Multi) => Some(collect(cell.date_time_list()?, Value::DateTime)),
        (DataKind::Double, Single) => cell.double()?.map(Value::Double),
        (DataKind::Double, Multi) => Some(collect(cell.double_list()?, Value::Double)),
        (DataKind::Float, Single) => cell.float()?.map(Value::Float),
        (DataKind::Float, Multi) => Some(collect(cell.float_list()?, Value::Float)),
        (DataKind::Guid, Single) => cell.guid()?.map(Value::Guid),
        (DataKind::Guid, Multi) => Some(collect(cell.guid_list()?, Value::Guid)),
        (DataKind::Id, Single) => cell.id()?.map(Value::Id),
        (DataKind::Id, Multi) => Some(collect(cell.id_list()?, Value::Id)),
        (DataKind::Integer, Single) => cell.integer()?.map(Value::Integer),
        (DataKind::Integer, Multi) => Some(collect(cell.integer_list()?, Value::Integer)),
        (DataKind::Long, Single) => cell.long()?.map(Value::Long),
        (DataKind::Long, Multi) => Some(collect(cell.long_list()?, Value::Long)),
        (DataKind::Reference, Single) => cell.reference()?.map(Value::Reference),
        (DataKind::Reference, Multi) => Some(Value::References(cell.reference_list()?)),
        (DataKind::Short, Single) => cell.short()?.map(Value::Short),
        (DataKind::Short, Multi) => Some(collect(cell.short_list()?, Value::Short)),
        (DataKind::String, Single) => cell.string()?.map(Value::String),
        (DataKind::String, Multi) => Some(collect(cell.string_list()?, Value::String)),
    };

    Ok(value)
}

fn collect<T>(items: Vec<T>, wrap: impl Fn(T) -> Value) -> Value {
    Value::List(items.into_iter().map(wrap).collect())
}

/// A getter reached a descriptor-backed cell, so a contract mismatch there
/// is the source's integrity problem, never the caller's.
fn reclassify_read(method: &str, binding: &PropertyBinding, err: PropertyError) -> DispatchError {
    match err {
        PropertyError::InvalidDataType { .. } => DispatchError::PredefinedShape {
            method: method.to_string(),
            qname: binding.qname.clone(),
            source: err,
        },
        other => DispatchError::Property(other),
    }
}
