/*!

This is the long-form manual for `precinct_results` and `precinctmap`.

## Input formats

### Vote records

The results export of the county: one line per precinct, candidate and contest.
The following providers are supported:
* `csv` Comma Separated Values (the default)
* `xlsx` the same table saved as an Excel workbook

The first lines of the exports usually hold a title and a date. They are skipped
with `skipRows` (2 by default). The line after them is the header. The columns
are found by name:

| Column | Default name | Required |
|---|---|---|
| contest | `Contest Name` | yes |
| candidate | `Candidate Name` | yes |
| precinct | `nameplace` | yes |
| votes | `Votes` | yes |
| absentee and mail-in | `Absentee and Mail-In Ballots Votes` | no |
| election day | `Election Day Votes` | no |
| provisional | `Provisional Votes` | no |

The three ballot-type columns are only used for the breakdown by ballot type.
A county-wide summary export with the same columns can be given as
`summarySource`; its breakdown then replaces the one summed from the precincts.

### Precinct boundaries

A GeoJSON `FeatureCollection`. Each feature names its precinct in
`properties.nameplace` (the property can be changed with `idProperty`).

Leading and trailing spaces are removed from every cell of the exports and from
the identifiers of the boundaries, before the clean-up rules below.

## Processing

1. The records of the contest are kept. An unknown contest stops the program and
   lists the contests found in the file.
2. The records are pivoted to one row per precinct. A candidate without a record
   in a precinct has 0 votes there. Two records for the same precinct and
   candidate stop the program.
3. Precinct names are cleaned up with an ordered list of find/replace rules. The
   default rules are:
   * `"# "` becomes `"#"`
   * `"  "` becomes `" "`
   * `"Boro"` becomes `"Borough"`, except inside `"Borough"` and `"Doylestown Boro"`

   The rules are applied again until nothing changes. Cleaning up a clean name
   does nothing.
4. Each precinct gets a total, a percentage per candidate, the lead of the first
   tracked candidate over the second one (in percentage points) and a lead
   bucket. Precincts without any vote get 0 everywhere and the "No votes" label.
5. The hover text of each precinct is written in HTML (`html`, the default) or
   plain text (`plain`).

## Lead buckets

| Lead | Label |
|---|---|
| lead <= -50 | `Second >50%` |
| -50 < lead <= -25 | `Second 25-50%` |
| -25 < lead <= -10 | `Second 10-25%` |
| -10 < lead < 0 | `Second 0-10%` |
| 0 <= lead < 10 | `First 0-10%` |
| 10 <= lead < 25 | `First 10-25%` |
| 25 <= lead < 50 | `First 25-50%` |
| 50 <= lead | `First >50%` |

`First` and `Second` are replaced by the labels of the tracked candidates.

## Configuration file

```json
{
  "outputSettings": {
    "contestName": "Representative in Congress (Rep)",
    "outputPath": "dataset.json",
    "csvOutputPath": "precincts.csv",
    "hoverStyle": "html"
  },
  "voteSource": { "provider": "csv", "filePath": "Precincts_17.csv", "skipRows": 2 },
  "summarySource": { "provider": "csv", "filePath": "summary_17.csv", "skipRows": 2 },
  "geometrySource": { "filePath": "Bucks_County_Voting_Precincts_2024.geojson" },
  "candidates": [
    { "name": "Brian Fitzpatrick", "label": "Fitzpatrick", "color": "blue" },
    { "name": "Mark Houck", "label": "Houck", "color": "red" }
  ],
  "joinPolicy": "warn"
}
```

With `"joinPolicy": "strict"`, a precinct without boundary (or a boundary without
results) stops the program instead of printing a warning.

## Output

A JSON document with the precinct rows, the legend, the county summary, the
breakdown by ballot type and the list of identifiers that did not join.

*/
