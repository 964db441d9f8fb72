//! Programmable swap transaction assembly.
//!
//! Builds the instruction sequence for a copied swap and serializes it
//! into the byte form the submission interface signs over. The command
//! order mirrors the router call convention:
//!
//! 1. `0x2::coin::zero<TokenA>` output placeholder
//! 2. split the funding amount from the gas coin
//! 3. `router::swap<TokenA, TokenB>` with the pool, both coins, the
//!    direction flags, amount, sqrt-price limit, swap_all = false and
//!    the clock
//! 4. transfer both returned coins back to the sender

use crate::error::{ExecutorError, ExecutorResult};
use copybot_core::{MoveFunction, SuiAddress, SwapOrder};
use copybot_decode::BcsWriter;

/// Lowest valid pool sqrt price (Cetus protocol constant).
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;
/// Highest valid pool sqrt price (Cetus protocol constant).
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_515_401_279_992_447_579_055;

/// The singleton clock object.
pub const CLOCK_OBJECT_ID: SuiAddress = SuiAddress({
    let mut bytes = [0u8; 32];
    bytes[31] = 0x06;
    bytes
});
/// The clock's initial shared version, fixed at genesis.
const CLOCK_INITIAL_VERSION: u64 = 1;

/// The Sui framework package (`0x2`).
const FRAMEWORK_ADDRESS: SuiAddress = SuiAddress({
    let mut bytes = [0u8; 32];
    bytes[31] = 0x02;
    bytes
});

/// Slippage bound for a swap direction.
///
/// An A -> B swap pushes the pool price down, so the bound is the
/// protocol minimum; B -> A pushes it up, so the bound is the maximum.
/// Inverting this choice makes the router abort every swap.
pub fn sqrt_price_limit(a_to_b: bool) -> u128 {
    if a_to_b {
        MIN_SQRT_PRICE_X64
    } else {
        MAX_SQRT_PRICE_X64
    }
}

/// A transaction input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallInput {
    /// BCS-encoded pure value.
    Pure(Vec<u8>),
    /// Reference to a shared object.
    SharedObject {
        id: SuiAddress,
        initial_shared_version: u64,
        mutable: bool,
    },
}

/// Reference to an input or a previous command's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// The gas coin.
    GasCoin,
    /// Input at the given index.
    Input(u16),
    /// Single result of the command at the given index.
    Result(u16),
    /// Element of a multi-value command result.
    NestedResult(u16, u16),
}

/// One programmable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCall {
        function: MoveFunction,
        type_arguments: Vec<String>,
        arguments: Vec<Argument>,
    },
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
}

/// Accumulates inputs and commands, then serializes the bundle.
#[derive(Debug)]
pub struct TransactionBuilder {
    sender: SuiAddress,
    inputs: Vec<CallInput>,
    commands: Vec<Command>,
    gas_budget: u64,
    gas_price: u64,
}

impl TransactionBuilder {
    pub fn new(sender: SuiAddress, gas_budget: u64, gas_price: u64) -> Self {
        Self {
            sender,
            inputs: Vec::new(),
            commands: Vec::new(),
            gas_budget,
            gas_price,
        }
    }

    pub fn sender(&self) -> SuiAddress {
        self.sender
    }

    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    pub fn gas_budget(&self) -> u64 {
        self.gas_budget
    }

    pub fn inputs(&self) -> &[CallInput] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn push_input(&mut self, input: CallInput) -> Argument {
        self.inputs.push(input);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    pub fn input_shared(&mut self, id: SuiAddress, initial_shared_version: u64, mutable: bool) -> Argument {
        self.push_input(CallInput::SharedObject {
            id,
            initial_shared_version,
            mutable,
        })
    }

    pub fn input_pure_u64(&mut self, v: u64) -> Argument {
        let mut w = BcsWriter::new();
        w.write_u64_le(v);
        self.push_input(CallInput::Pure(w.into_bytes()))
    }

    pub fn input_pure_u128(&mut self, v: u128) -> Argument {
        let mut w = BcsWriter::new();
        w.write_u128_le(v);
        self.push_input(CallInput::Pure(w.into_bytes()))
    }

    pub fn input_pure_bool(&mut self, v: bool) -> Argument {
        let mut w = BcsWriter::new();
        w.write_bool(v);
        self.push_input(CallInput::Pure(w.into_bytes()))
    }

    pub fn input_pure_address(&mut self, v: &SuiAddress) -> Argument {
        let mut w = BcsWriter::new();
        w.write_address(v);
        self.push_input(CallInput::Pure(w.into_bytes()))
    }

    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }

    pub fn move_call(
        &mut self,
        function: MoveFunction,
        type_arguments: Vec<String>,
        arguments: Vec<Argument>,
    ) -> Argument {
        let idx = self.push_command(Command::MoveCall {
            function,
            type_arguments,
            arguments,
        });
        Argument::Result(idx)
    }

    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Argument {
        let idx = self.push_command(Command::SplitCoins { coin, amounts });
        Argument::Result(idx)
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, address: Argument) {
        self.push_command(Command::TransferObjects { objects, address });
    }

    /// Serialize the bundle into the canonical signed byte form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = BcsWriter::new();
        w.write_address(&self.sender)
            .write_u64_le(self.gas_price)
            .write_u64_le(self.gas_budget)
            .write_uleb128(self.inputs.len() as u64);
        for input in &self.inputs {
            match input {
                CallInput::Pure(bytes) => {
                    w.write_u8(0).write_vec_bytes(bytes);
                }
                CallInput::SharedObject {
                    id,
                    initial_shared_version,
                    mutable,
                } => {
                    w.write_u8(1)
                        .write_address(id)
                        .write_u64_le(*initial_shared_version)
                        .write_bool(*mutable);
                }
            }
        }
        w.write_uleb128(self.commands.len() as u64);
        for command in &self.commands {
            match command {
                Command::MoveCall {
                    function,
                    type_arguments,
                    arguments,
                } => {
                    w.write_u8(0)
                        .write_address(&function.package)
                        .write_string(&function.module)
                        .write_string(&function.function)
                        .write_uleb128(type_arguments.len() as u64);
                    for tag in type_arguments {
                        w.write_string(tag);
                    }
                    write_arguments(&mut w, arguments);
                }
                Command::SplitCoins { coin, amounts } => {
                    w.write_u8(1);
                    write_argument(&mut w, coin);
                    write_arguments(&mut w, amounts);
                }
                Command::TransferObjects { objects, address } => {
                    w.write_u8(2);
                    write_arguments(&mut w, objects);
                    write_argument(&mut w, address);
                }
            }
        }
        w.into_bytes()
    }
}

fn write_arguments(w: &mut BcsWriter, args: &[Argument]) {
    w.write_uleb128(args.len() as u64);
    for arg in args {
        write_argument(w, arg);
    }
}

fn write_argument(w: &mut BcsWriter, arg: &Argument) {
    match arg {
        Argument::GasCoin => {
            w.write_u8(0);
        }
        Argument::Input(i) => {
            w.write_u8(1).write_u16_le(*i);
        }
        Argument::Result(i) => {
            w.write_u8(2).write_u16_le(*i);
        }
        Argument::NestedResult(i, j) => {
            w.write_u8(3).write_u16_le(*i).write_u16_le(*j);
        }
    }
}

/// Build the full swap instruction sequence for an order.
///
/// `pool_shared_version` must already be resolved; `gas_price` is the
/// final (priority-bid) price.
pub fn build_swap(
    order: &SwapOrder,
    sender: SuiAddress,
    pool_shared_version: u64,
    gas_price: u64,
) -> ExecutorResult<TransactionBuilder> {
    if order.token_a == order.token_b {
        return Err(ExecutorError::Build(format!(
            "degenerate pair: {}",
            order.token_a
        )));
    }

    let mut tx = TransactionBuilder::new(sender, order.gas_budget, gas_price);

    let global_config = tx.input_shared(
        order.global_config,
        order.global_config_shared_version,
        true,
    );
    let pool = tx.input_shared(order.pool, pool_shared_version, true);
    let clock = tx.input_shared(CLOCK_OBJECT_ID, CLOCK_INITIAL_VERSION, false);

    let split_amount = tx.input_pure_u64(order.amount);
    let a_to_b = tx.input_pure_bool(order.a_to_b);
    let by_amount_in = tx.input_pure_bool(order.by_amount_in);
    let amount = tx.input_pure_u64(order.amount);
    let price_limit = tx.input_pure_u128(order.sqrt_price_limit);
    let swap_all = tx.input_pure_bool(false);
    let recipient = tx.input_pure_address(&sender);

    // Zero-value placeholder of the output coin type.
    let zero_coin = tx.move_call(
        MoveFunction::new(FRAMEWORK_ADDRESS, "coin", "zero"),
        vec![order.token_a.clone()],
        vec![],
    );

    let funding_coin = tx.split_coins(Argument::GasCoin, vec![split_amount]);

    let swap_result = tx.move_call(
        order.router.clone(),
        vec![order.token_a.clone(), order.token_b.clone()],
        vec![
            global_config,
            pool,
            zero_coin,
            funding_coin,
            a_to_b,
            by_amount_in,
            amount,
            price_limit,
            swap_all,
            clock,
        ],
    );

    // Route both returned coin values back to the signer.
    let Argument::Result(swap_idx) = swap_result else {
        return Err(ExecutorError::Build("swap call produced no result".into()));
    };
    tx.transfer_objects(
        vec![
            Argument::NestedResult(swap_idx, 0),
            Argument::NestedResult(swap_idx, 1),
        ],
        recipient,
    );

    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(a_to_b: bool) -> SwapOrder {
        SwapOrder {
            router: "0xfbb32ac0fa89a3cb0c56c745b688c6d2a53ac8e43447119ad822763997ffb9c3::router::swap"
                .parse()
                .unwrap(),
            global_config: SuiAddress::from_hex("0xdaa4").unwrap(),
            global_config_shared_version: 1_574_190,
            pool: SuiAddress::from_hex("0xb8d7").unwrap(),
            pool_shared_version: None,
            token_a: "0x2::sui::SUI".into(),
            token_b: "0xdba3::usdc::USDC".into(),
            a_to_b,
            amount: 100_000_000,
            by_amount_in: true,
            sqrt_price_limit: sqrt_price_limit(a_to_b),
            gas_budget: 100_000_000,
            gas_price_multiplier: 2.0,
        }
    }

    #[test]
    fn price_limit_follows_direction() {
        assert_eq!(sqrt_price_limit(true), MIN_SQRT_PRICE_X64);
        assert_eq!(sqrt_price_limit(false), MAX_SQRT_PRICE_X64);
    }

    #[test]
    fn swap_command_sequence_and_argument_order() {
        let sender = SuiAddress::from_hex("0xabcd").unwrap();
        let tx = build_swap(&order(true), sender, 373_623_018, 1500).unwrap();

        assert_eq!(tx.commands().len(), 4);

        // coin::zero placeholder comes first, typed with token A.
        let Command::MoveCall {
            function,
            type_arguments,
            ..
        } = &tx.commands()[0]
        else {
            panic!("expected zero-coin call");
        };
        assert_eq!(function.module, "coin");
        assert_eq!(function.function, "zero");
        assert_eq!(type_arguments, &["0x2::sui::SUI".to_string()]);

        // Funding split draws from the gas coin.
        let Command::SplitCoins { coin, amounts } = &tx.commands()[1] else {
            panic!("expected split");
        };
        assert_eq!(*coin, Argument::GasCoin);
        assert_eq!(amounts.len(), 1);

        // Router call carries both type arguments in [A, B] order and
        // the documented ten arguments.
        let Command::MoveCall {
            function,
            type_arguments,
            arguments,
        } = &tx.commands()[2]
        else {
            panic!("expected router call");
        };
        assert_eq!(function.function, "swap");
        assert_eq!(
            type_arguments,
            &["0x2::sui::SUI".to_string(), "0xdba3::usdc::USDC".to_string()]
        );
        assert_eq!(arguments.len(), 10);
        assert_eq!(arguments[2], Argument::Result(0));
        assert_eq!(arguments[3], Argument::Result(1));

        // Both swap outputs go back to the sender.
        let Command::TransferObjects { objects, .. } = &tx.commands()[3] else {
            panic!("expected transfer");
        };
        assert_eq!(
            objects,
            &[Argument::NestedResult(2, 0), Argument::NestedResult(2, 1)]
        );
    }

    #[test]
    fn pool_reference_is_mutable_with_resolved_version() {
        let sender = SuiAddress::ZERO;
        let tx = build_swap(&order(false), sender, 42, 1000).unwrap();
        let pool_input = &tx.inputs()[1];
        assert_eq!(
            *pool_input,
            CallInput::SharedObject {
                id: SuiAddress::from_hex("0xb8d7").unwrap(),
                initial_shared_version: 42,
                mutable: true,
            }
        );
    }

    #[test]
    fn degenerate_pair_is_a_build_error() {
        let mut bad = order(true);
        bad.token_b = bad.token_a.clone();
        assert!(matches!(
            build_swap(&bad, SuiAddress::ZERO, 1, 1),
            Err(ExecutorError::Build(_))
        ));
    }

    #[test]
    fn serialization_is_deterministic() {
        let sender = SuiAddress::from_hex("0xabcd").unwrap();
        let a = build_swap(&order(true), sender, 42, 1500).unwrap().to_bytes();
        let b = build_swap(&order(true), sender, 42, 1500).unwrap().to_bytes();
        assert_eq!(a, b);
        assert!(!a.is_empty());

        // Direction changes the serialized form (different price limit).
        let c = build_swap(&order(false), sender, 42, 1500).unwrap().to_bytes();
        assert_ne!(a, c);
    }
}
