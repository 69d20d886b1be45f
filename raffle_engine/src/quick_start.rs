/*!

# Quick start

This example runs a raffle end to end from an employee list exported by the dashboard.

**Getting the roster** The dashboard lists the employees with their raffle entries. Save the
response of the employee list as a JSON file. It should look like the following (only the
fields below are used):

```text
{
  "success": true,
  "employees": [
    {"id": 1, "name": "Anna Smith", "total_entries": 3, "department": "Care"},
    {"id": 2, "name": "Bob Jones", "total_entries": 1, "department": "Office"},
    {"id": 3, "name": "Clara Diaz", "total_entries": 0}
  ]
}
```

Employees without entries are not part of the draw. Here, `Anna Smith` has a 75% chance of
winning and `Bob Jones` a 25% chance.

**Running the draw** Run `rafflectl` with the following command:

```bash
rafflectl -i employees.json --prize "Quarterly Prize"
```

After a short suspense (4 seconds by default, see `--reveal-delay-ms`), you should see the
outcome of the raffle:

```text
[2024-10-01T09:55:59Z INFO  raffle_engine] New raffle session: 2 participants, 4 entries
[2024-10-01T09:56:03Z INFO  raffle_engine] Raffle winner: Anna Smith (3 entries, 75.0% chance)
```

followed by a JSON summary of the raffle. The summary can be written to a file with the
`--out` flag.

**Reproducible draws** By default, every run is different. If a draw has to be audited, pass
a seed with `--seed`: the same roster and the same seed always give the same winner. A
summary produced this way can be checked later:

```bash
rafflectl -i employees.json --seed 2024-Q3 --out q3.json
rafflectl -i employees.json --seed 2024-Q3 --reference q3.json
```

**Importing from Excel** A roster can also be read directly from an Excel workbook, see the
[input formats](../manual/index.html#input-formats).

**Statistics** `rafflectl -i employees.json --stats` prints the totals, the top performers and
the breakdown per department instead of running a draw.

The same can be done from Rust:

```
use raffle_engine::builder::Builder;
use raffle_engine::{EngineRules, RaffleEngine};
use std::time::Duration;
# use raffle_engine::RaffleErrors;

let mut builder = Builder::new();
builder.add_employee("1", "Anna Smith", 3);
builder.add_employee("2", "Bob Jones", 1);

let rules = EngineRules {
    reveal_delay: Duration::ZERO,
    seed: Some("2024-Q3".to_string()),
};
let mut engine = RaffleEngine::new(&rules);
engine.load(builder.participants())?;
let result = engine.draw_blocking()?;
println!("{} wins!", result.winner.name);

# Ok::<(), RaffleErrors>(())
```

*/
