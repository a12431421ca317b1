//! Centralized Contract Definitions
//!
//! All Solidity contract interfaces consumed by the bot, defined with
//! ethers' `abigen!` macro (human-readable ABI). The flash-arbitrage
//! contract itself is external to this repository; only its call surface
//! is bound here.
//!
//! Author: AI-Generated
//! Created: 2026-08-03

use ethers::prelude::abigen;

// ── FlashArbitrage (external flash-loan arbitrage contract) ──────────

abigen!(
    FlashArbitrage,
    r#"[
        struct PoolData { address[] poolAddresses; uint256[] positionIds; uint256[] borrowAmounts; int256[] profits; }
        function getProfit(address tokenA, address tokenB, uint256 gasFee) external view returns (int256 profit, address baseToken)
        function executeFlashArbitrage(address[] calldata path1, address[] calldata path2, address[] calldata path3, uint256 borrowAmount, PoolData calldata poolData) external
        function getOrderedReserves(address tokenIn, address tokenOut, address pool) external view returns (uint256 reserveIn, uint256 reserveOut)
        function getBaseTokens() external view returns (address[] memory tokens)
        function addBaseToken(address token) external
        function removeBaseToken(address token) external
        function owner() external view returns (address)
    ]"#
);

// ── Uniswap V2 style (Quickswap, Apeswap, Sushiswap, Dfyn, Jetswap) ──

abigen!(
    IUniswapV2Factory,
    r#"[
        function getPair(address tokenA, address tokenB) external view returns (address pair)
    ]"#
);

abigen!(
    IUniswapV2Pair,
    r#"[
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
        function token0() external view returns (address)
        function token1() external view returns (address)
    ]"#
);

// ── Uniswap V3 ───────────────────────────────────────────────────────

abigen!(
    IUniswapV3Factory,
    r#"[
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool)
    ]"#
);
