//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;
use ucantool_core::cbor::{map_value, sort_canonical};
use ucantool_core::cid::DAG_CBOR;
use ucantool_core::{Cid, Codec, Command, Container, Did, Invocation, Map, Value};

use crate::signer::{InvokeOptions, Keypair, Principal};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a `did:key` or `did:web` DID.
pub fn did() -> impl Strategy<Value = Did> {
    prop_oneof![
        keypair().prop_map(|kp| kp.did()),
        "[a-z]{1,12}".prop_map(|host| {
            Did::parse(&format!("did:web:{host}.example")).expect("generated did:web is valid")
        }),
    ]
}

/// Generate a command path such as `/store/add`.
pub fn command() -> impl Strategy<Value = Command> {
    "(/[a-z]{1,8}){1,3}".prop_map(|s| Command::parse(&s).expect("generated command is valid"))
}

/// Generate a nonce.
pub fn nonce() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=16)
}

/// Generate an optional Unix timestamp before 2100.
pub fn timestamp() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(0i64..=4_102_444_800i64)
}

/// Generate a transport codec.
pub fn codec() -> impl Strategy<Value = Codec> {
    prop::sample::select(Codec::ALL.to_vec())
}

/// Generate a DAG-CBOR value that has a DAG-JSON form.
///
/// Nested maps come out in canonical key order, so a value compares equal
/// to its own decode.
pub fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Integer(n.into())),
        prop::sample::select(vec![
            Value::Integer(i64::MIN.into()),
            Value::Integer(i64::MAX.into()),
            Value::Integer(u64::MAX.into()),
        ]),
        prop::collection::vec(any::<u8>(), 0..32)
            .prop_map(|data| Cid::sum(DAG_CBOR, &data).to_link_value()),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Float),
        "[ -~]{0,16}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(|entries| {
                let mut map: Map = entries.into_iter().collect();
                sort_canonical(&mut map);
                map_value(map)
            }),
        ]
    })
}

/// Generate a string-keyed map in canonical key order.
pub fn map() -> impl Strategy<Value = Map> {
    prop::collection::btree_map("[a-z]{1,8}", value(), 0..6).prop_map(|entries| {
        let mut map: Map = entries.into_iter().collect();
        sort_canonical(&mut map);
        map
    })
}

/// Parameters for generating an invocation.
#[derive(Debug, Clone)]
pub struct InvocationParams {
    pub seed: [u8; 32],
    pub subject: Did,
    pub audience: Option<Did>,
    pub command: Command,
    pub arguments: Map,
    pub metadata: Option<Map>,
    pub nonce: Vec<u8>,
    pub expiration: Option<i64>,
    pub issued_at: Option<i64>,
}

impl Arbitrary for InvocationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            did(),
            prop::option::of(did()),
            command(),
            map(),
            prop::option::of(map()),
            nonce(),
            timestamp(),
            timestamp(),
        )
            .prop_map(
                |(seed, subject, audience, command, arguments, metadata, nonce, exp, iat)| {
                    InvocationParams {
                        seed,
                        subject,
                        audience,
                        command,
                        arguments,
                        metadata,
                        nonce,
                        expiration: exp,
                        issued_at: iat,
                    }
                },
            )
            .boxed()
    }
}

/// Build a signed invocation from parameters.
pub fn invocation_from_params(params: &InvocationParams) -> Invocation {
    Principal::from_seed(params.seed)
        .invoke(
            &params.subject,
            &params.command,
            InvokeOptions {
                arguments: params.arguments.clone(),
                audience: params.audience.clone(),
                metadata: params.metadata.clone(),
                nonce: params.nonce.clone(),
                expiration: params.expiration,
                issued_at: params.issued_at,
                ..Default::default()
            },
        )
        .expect("generated invocation encodes")
}

/// Generate a container of opaque entries.
pub fn container() -> impl Strategy<Value = Container> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..5)
        .prop_map(|entries| Container::new(entries.into_iter().map(Bytes::from).collect()))
}
