//! Signal engine driven end to end through bounded queues.

use corelib::{Pair, PriceSample, Recommendation};
use engine::{EngineConfig, SignalEngine, TickSource};
use tokio::sync::mpsc;

fn arrival_config(short_window: usize, long_window: usize) -> EngineConfig {
    EngineConfig {
        short_window,
        long_window,
        tick: TickSource::FeedArrival,
    }
}

async fn send_all(tx: &mpsc::Sender<PriceSample>, prices: &[f64]) {
    for (i, p) in prices.iter().enumerate() {
        tx.send(PriceSample::new(*p, i as i64)).await.unwrap();
    }
}

#[tokio::test]
async fn single_rise_yields_exactly_one_buy() {
    let (price_tx, price_rx) = mpsc::channel(256);
    let (rec_tx, mut rec_rx) = mpsc::channel(256);

    let engine = SignalEngine::new(
        Pair::new("BTC", "USD"),
        &arrival_config(2, 4),
        price_rx,
        rec_tx,
    )
    .unwrap();

    send_all(&price_tx, &[10.0, 10.0, 10.0, 10.0, 20.0, 20.0]).await;
    drop(price_tx);

    let stats = engine.run().await;

    assert_eq!(rec_rx.recv().await, Some(Recommendation::buy()));
    assert_eq!(rec_rx.recv().await, None);
    assert_eq!((stats.buys, stats.sells, stats.samples), (1, 0, 6));
}

#[tokio::test]
async fn alternating_trend_alternates_signals() {
    let (price_tx, price_rx) = mpsc::channel(256);
    let (rec_tx, mut rec_rx) = mpsc::channel(256);

    let engine = SignalEngine::new(
        Pair::new("ETH", "USD"),
        &arrival_config(2, 4),
        price_rx,
        rec_tx,
    )
    .unwrap();
    let handle = tokio::spawn(engine.run());

    send_all(&price_tx, &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]).await;
    assert_eq!(rec_rx.recv().await, Some(Recommendation::buy()));

    send_all(&price_tx, &[10.0, 5.0, 4.0, 3.0]).await;
    assert_eq!(rec_rx.recv().await, Some(Recommendation::sell()));

    send_all(&price_tx, &[8.0, 12.0, 20.0, 30.0]).await;
    assert_eq!(rec_rx.recv().await, Some(Recommendation::buy()));

    drop(price_tx);
    let stats = handle.await.unwrap();

    assert_eq!((stats.buys, stats.sells), (2, 1));
    assert_eq!(rec_rx.recv().await, None);
}

#[tokio::test]
async fn engine_outlives_a_dropped_consumer() {
    let (price_tx, price_rx) = mpsc::channel(256);
    let (rec_tx, rec_rx) = mpsc::channel(1);
    drop(rec_rx);

    let engine = SignalEngine::new(
        Pair::new("BTC", "USD"),
        &arrival_config(2, 4),
        price_rx,
        rec_tx,
    )
    .unwrap();

    send_all(&price_tx, &[1.0, 1.0, 1.0, 1.0, 9.0, 9.0]).await;
    drop(price_tx);

    let stats = engine.run().await;
    assert_eq!(stats.buys, 1);
}

#[test]
fn rejects_inverted_windows() {
    let (_tx, rx) = mpsc::channel::<PriceSample>(1);
    let (rec_tx, _rec_rx) = mpsc::channel::<Recommendation>(1);

    assert!(SignalEngine::new(Pair::new("BTC", "USD"), &arrival_config(20, 5), rx, rec_tx).is_err());
}
