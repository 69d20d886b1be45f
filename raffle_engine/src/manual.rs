/*!

This is the long-form manual for `raffle_engine` and `rafflectl`.

## The draw

Every employee with at least one raffle entry takes part in the draw. The chance of winning
of an employee is the number of their entries divided by the total number of entries.

The draw picks a number uniformly between 0 (included) and the total number of entries
(excluded). The participants are laid out in order on this range, each taking as much room
as their number of entries, and the participant under the number wins. For example, with
`Anna` (1 entry) and `Bob` (3 entries), `Anna` covers `[0, 1)` and `Bob` covers `[1, 4)`.

Winners are not removed: two draws over the same roster are independent.

A raffle goes through three states:
* `Idle`: ready to draw
* `Spinning`: the draw has started, the winner is held back for a short delay
* `Revealed`: the winner is known

Only a reset leads back to `Idle`. Starting a draw while one is already in progress is an error.
A reset while spinning cancels the pending reveal.

## Input formats

The following formats are supported:
* `json` Employee list
* `excel` Excel roster (.xlsx)

### `json`

Either the response of the employee list of the dashboard:

```text
{"success": true, "employees": [{"id": 1, "name": "Anna", "total_entries": 3}]}
```

or directly the array of employees. The `id` may be a number or a string. The `department`
field is optional and is only used for statistics.

### `excel`

An Excel spreadsheet with one employee per row and the column names in the first row.
The names are found as follows:
* if there is a first name and a last name column, they are joined
* otherwise a column named like `Full Name`, `Employee Name`, `Caregiver Name` or `Staff Name`
* otherwise the first column with `name`, `caregiver`, `employee` or `staff` in its title
* otherwise the first column.

Cells that do not look like names (fewer than 3 characters, no letter, `none`, `null`, `nan`)
are skipped, as well as duplicate names.

The entries are read from a column with `entries` or `points` in its title. Without such a column,
all the employees have 0 entries and the roster can only be used for statistics.

## Configuration

`rafflectl` comes with sensible defaults. A configuration file in JSON can be passed with `--config`:

```text
{
  "outputSettings": {"raffleName": "Q3 raffle", "prize": "Gift card", "outputDirectory": "out"},
  "rosterSources": [
    {"provider": "excel", "filePath": "roster.xlsx", "excelWorksheetName": "Sheet1",
     "entriesColumnIndex": 4}
  ],
  "rules": {"revealDelayMs": 1000, "randomSeed": "2024-Q3", "topPerformers": 10}
}
```

File paths are relative to the configuration file. Column indexes start at 1. The flags of
the command line take precedence over the configuration file.

 */
