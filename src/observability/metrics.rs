use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub transitions_total: IntCounterVec,
    pub parcels_created_total: IntCounter,
    pub quotes_total: IntCounter,
    pub active_parcels: IntGauge,
    pub delivery_turnaround_hours: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let transitions_total = IntCounterVec::new(
            Opts::new("transitions_total", "Total status transitions by outcome"),
            &["outcome"],
        )
        .expect("valid transitions_total metric");

        let parcels_created_total =
            IntCounter::new("parcels_created_total", "Total parcels created")
                .expect("valid parcels_created_total metric");

        let quotes_total = IntCounter::new("quotes_total", "Total cost quotes served")
            .expect("valid quotes_total metric");

        let active_parcels =
            IntGauge::new("active_parcels", "Parcels not yet in a terminal status")
                .expect("valid active_parcels metric");

        let delivery_turnaround_hours = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "delivery_turnaround_hours",
                "Hours from parcel creation to delivery",
            )
            .buckets(vec![6.0, 12.0, 24.0, 48.0, 72.0, 120.0, 168.0]),
            &["delivery_type"],
        )
        .expect("valid delivery_turnaround_hours metric");

        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(parcels_created_total.clone()))
            .expect("register parcels_created_total");
        registry
            .register(Box::new(quotes_total.clone()))
            .expect("register quotes_total");
        registry
            .register(Box::new(active_parcels.clone()))
            .expect("register active_parcels");
        registry
            .register(Box::new(delivery_turnaround_hours.clone()))
            .expect("register delivery_turnaround_hours");

        Self {
            registry,
            transitions_total,
            parcels_created_total,
            quotes_total,
            active_parcels,
            delivery_turnaround_hours,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
