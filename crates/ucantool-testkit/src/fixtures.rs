//! Sample artifacts for integration tests.
//!
//! [`FruitMarket`] is a complete flow: a market delegates `/fruits/purchase`
//! to alice under a policy, alice invokes it, and the market issues a receipt
//! for the invocation's task. All keys are seeded, so every artifact is
//! byte-for-byte reproducible.

use bytes::Bytes;
use ucantool_core::cbor::map_value;
use ucantool_core::cid::DAG_CBOR;
use ucantool_core::{
    Cid, Codec, Command, Container, Delegation, Did, Invocation, Outcome, Receipt, Value,
};

use crate::signer::{DelegateOptions, InvokeOptions, Keypair, Principal};

/// A fixed link used in sample arguments and metadata.
pub const SAMPLE_LINK: &str = "bafkreigh2akiscaildcqabsyg3dfr6chu3fgpregiymsck7e7aqa4s52zy";

/// Subject of [`sample_invocation`].
pub const SAMPLE_SUBJECT: &str = "did:key:z6MkrYxEAeY8bQGaxaY2S5QuN7skMSAyye3XacFxk2iMFw5G";

/// Fixed "now" for every sample, 2024-01-01 00:00:00 UTC.
pub const SAMPLE_NOW: i64 = 1_704_067_200;

const ALICE_SEED: [u8; 32] = [0xa1; 32];
const MARKET_SEED: [u8; 32] = [0x3c; 32];
const ISSUER_SEED: [u8; 32] = [0x42; 32];

fn text(s: &str) -> Value {
    Value::Text(s.into())
}

fn sample_link() -> Cid {
    SAMPLE_LINK.parse().expect("sample link is a valid CID")
}

fn did(s: &str) -> Did {
    Did::parse(s).expect("sample DID is valid")
}

fn command(s: &str) -> Command {
    Command::parse(s).expect("sample command is valid")
}

/// Every artifact of the fruit-market flow.
#[derive(Debug, Clone)]
pub struct FruitMarket {
    pub alice: Principal,
    pub market: Principal,
    pub delegation: Delegation,
    pub invocation: Invocation,
    pub receipt: Receipt,
}

impl FruitMarket {
    pub fn new() -> Self {
        let alice = Principal::from_seed(ALICE_SEED);
        let market = Principal::wrap(Keypair::from_seed(&MARKET_SEED), did("did:web:fruit.market"));
        let purchase = command("/fruits/purchase");

        let delegation = market
            .delegate(
                alice.did(),
                &purchase,
                DelegateOptions {
                    subject: Some(market.did().clone()),
                    policy: fruit_policy(),
                    nonce: b"dlg-nonce-01".to_vec(),
                    expiration: Some(SAMPLE_NOW + 3600),
                    ..Default::default()
                },
            )
            .expect("sample delegation encodes");

        let proof = Cid::sum(
            DAG_CBOR,
            &delegation.encode().expect("sample delegation encodes"),
        );

        let invocation = alice
            .invoke(
                market.did(),
                &purchase,
                InvokeOptions {
                    arguments: vec![(
                        "fruits".into(),
                        Value::Array(vec![text("apple"), text("banana")]),
                    )],
                    proofs: vec![proof],
                    metadata: Some(vec![
                        ("id".into(), Value::Text(Keypair::from_seed(&[9; 32]).did().to_string())),
                        ("root".into(), sample_link().to_link_value()),
                        ("name".into(), text("test")),
                        ("size".into(), Value::Integer(1000.into())),
                        (
                            "blob".into(),
                            map_value(vec![("digest".into(), Value::Bytes(vec![1, 2, 3]))]),
                        ),
                    ]),
                    nonce: b"inv-nonce-01".to_vec(),
                    expiration: Some(SAMPLE_NOW + 30),
                    issued_at: Some(SAMPLE_NOW),
                    ..Default::default()
                },
            )
            .expect("sample invocation encodes");

        let receipt = market
            .issue_receipt(
                invocation.task.clone(),
                Outcome::Ok(Value::Integer(42.into())),
                Some(SAMPLE_NOW + 1),
            )
            .expect("sample receipt encodes");

        Self {
            alice,
            market,
            delegation,
            invocation,
            receipt,
        }
    }

    /// The container bundling delegation, invocation and receipt, in that order.
    pub fn container(&self) -> Container {
        Container::new(vec![
            Bytes::from(self.delegation.encode().expect("sample delegation encodes")),
            Bytes::from(self.invocation.encode().expect("sample invocation encodes")),
            Bytes::from(self.receipt.encode().expect("sample receipt encodes")),
        ])
    }

    /// The container in the transported form for `codec`.
    pub fn container_bytes(&self, codec: Codec) -> Vec<u8> {
        self.container()
            .encode(codec)
            .expect("sample container encodes")
    }
}

impl Default for FruitMarket {
    fn default() -> Self {
        Self::new()
    }
}

/// `all .fruits` entries must be apple, orange or banana.
pub fn fruit_policy() -> Vec<Value> {
    let equals = |fruit: &str| Value::Array(vec![text("=="), text("."), text(fruit)]);
    vec![Value::Array(vec![
        text("all"),
        text(".fruits"),
        Value::Array(vec![
            text("or"),
            Value::Array(vec![equals("apple"), equals("orange"), equals("banana")]),
        ]),
    ])]
}

/// A standalone invocation with an audience and a spread of argument types.
pub fn sample_invocation() -> Invocation {
    let issuer = Principal::from_seed(ISSUER_SEED);
    issuer
        .invoke(
            &did(SAMPLE_SUBJECT),
            &command("/test/invoke"),
            InvokeOptions {
                arguments: vec![
                    ("id".into(), Value::Text(Keypair::from_seed(&[8; 32]).did().to_string())),
                    ("link".into(), sample_link().to_link_value()),
                    ("str".into(), text("test")),
                    ("num".into(), Value::Integer(1000.into())),
                    ("bytes".into(), Value::Bytes(vec![1, 2, 3])),
                    (
                        "obj".into(),
                        map_value(vec![("bytes".into(), Value::Bytes(vec![4, 5, 6]))]),
                    ),
                    (
                        "list".into(),
                        Value::Array(vec![text("one"), text("two"), text("three")]),
                    ),
                ],
                audience: Some(did("did:web:example.com")),
                nonce: b"sample-nonce".to_vec(),
                ..Default::default()
            },
        )
        .expect("sample invocation encodes")
}

/// A receipt reporting an error outcome.
pub fn sample_error_receipt() -> Receipt {
    let executor = Principal::wrap(Keypair::from_seed(&MARKET_SEED), did("did:web:fruit.market"));
    executor
        .issue_receipt(
            sample_invocation().task,
            Outcome::Error(map_value(vec![("message".into(), text("out of apples"))])),
            None,
        )
        .expect("sample receipt encodes")
}
