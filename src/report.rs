use crate::expense::ExpenseBreakdown;
use crate::types::Projection;
use anyhow::{Context, Result};
use rmp_serde::{decode, encode};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

impl Projection {
    /// Save the whole projection as MessagePack.
    pub fn save<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write(&mut writer, &self).context("failed to serialize projection")?;
        writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }

    /// Load a projection previously written by [`Projection::save`].
    pub fn load<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);
        let projection = decode::from_read(&mut reader).context("failed to deserialize projection")?;
        Ok(projection)
    }

    /// Write one row per month.
    pub fn write_monthly_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header: Vec<String> = ["month", "dealers", "new_companies", "events"]
            .map(String::from)
            .to_vec();
        header.extend(self.robot_names.iter().map(|name| format!("units_{name}")));
        header.extend(
            [
                "new_users",
                "trial_starts",
                "paying_users",
                "fte",
                "commission",
                "subscription",
                "revenue",
            ]
            .map(String::from),
        );
        header.extend(expense_columns());
        header.extend(["total_expense", "profit"].map(String::from));
        csv.write_record(&header).context("failed to write monthly header")?;

        for m in &self.monthly {
            let mut row = vec![
                m.month.to_string(),
                m.dealers.to_string(),
                m.new_companies.to_string(),
                m.events.to_string(),
            ];
            row.extend(m.units.iter().map(u64::to_string));
            row.extend([
                m.new_users.to_string(),
                m.trial_starts.to_string(),
                m.paying_users.to_string(),
                m.fte.to_string(),
                m.commission.to_string(),
                m.subscription.to_string(),
                m.revenue.to_string(),
            ]);
            row.extend(m.expenses.items().map(|(_, value)| value.to_string()));
            row.extend([m.total_expense.to_string(), m.profit.to_string()]);
            csv.write_record(&row)
                .with_context(|| format!("failed to write month {}", m.month))?;
        }

        csv.flush().context("failed to flush monthly csv")?;
        Ok(())
    }

    /// Write one row per year.
    pub fn write_annual_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header: Vec<String> = ["year", "months"].map(String::from).to_vec();
        header.extend(self.robot_names.iter().map(|name| format!("units_{name}")));
        header.extend(["new_users", "commission", "subscription", "revenue"].map(String::from));
        header.extend(expense_columns());
        header.extend(["total_expense", "profit", "cumulative_profit"].map(String::from));
        csv.write_record(&header).context("failed to write annual header")?;

        for y in &self.annual {
            let mut row = vec![(y.year + 1).to_string(), y.months.to_string()];
            row.extend(y.units.iter().map(u64::to_string));
            row.extend([
                y.new_users.to_string(),
                y.commission.to_string(),
                y.subscription.to_string(),
                y.revenue.to_string(),
            ]);
            row.extend(y.expenses.items().map(|(_, value)| value.to_string()));
            row.extend([
                y.total_expense.to_string(),
                y.profit.to_string(),
                y.cumulative_profit.to_string(),
            ]);
            csv.write_record(&row)
                .with_context(|| format!("failed to write year {}", y.year + 1))?;
        }

        csv.flush().context("failed to flush annual csv")?;
        Ok(())
    }

    /// Log the headline figures and the per-year results.
    pub fn log_summary(&self) {
        let s = &self.summary;
        log::info!("total revenue:      {:>16.0}", s.total_revenue);
        log::info!("  subscription:     {:>16.0}", s.total_subscription);
        log::info!("  commission:       {:>16.0}", s.total_commission);
        log::info!("total expense:      {:>16.0}", s.total_expense);
        for (name, value) in s.expenses.categories() {
            log::info!("  {:<18}{:>16.0}", format!("{name}:"), value);
        }
        log::info!("total profit:       {:>16.0}", s.total_profit);
        log::info!("final paying users: {:>16.0}", s.final_paying_users);

        for y in &self.annual {
            log::info!(
                "year {:>2}: revenue {:>14.0} expense {:>14.0} profit {:>14.0} cumulative {:>14.0}",
                y.year + 1,
                y.revenue,
                y.total_expense,
                y.profit,
                y.cumulative_profit
            );
        }
    }
}

fn expense_columns() -> impl Iterator<Item = String> {
    ExpenseBreakdown::default()
        .items()
        .into_iter()
        .map(|(name, _)| name.to_string())
}
